use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storage::{FileStore, MemDisk, DISK_MAX_SIZE, SECTOR_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskEntry {
    pub name: String,
    pub size: usize,
}

/// Encode `files` as a disk image the kernel can mount.
pub fn build_disk(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut store = Box::new(FileStore::new());
    for (name, data) in files {
        store
            .insert(name.as_bytes(), data)
            .with_context(|| format!("cannot add {}", name))?;
    }

    let mut disk = MemDisk::new(DISK_MAX_SIZE / SECTOR_SIZE);
    store.flush(&mut disk);
    Ok(disk.into_image())
}

/// Files stored in a disk image, in archive order.
pub fn list_disk(image: &[u8]) -> Result<Vec<DiskEntry>> {
    let mut store = Box::new(FileStore::new());
    store.load_image(image).context("not a valid disk image")?;

    Ok(store
        .iter()
        .map(|file| DiskEntry {
            name: String::from_utf8_lossy(file.name()).into_owned(),
            size: file.size(),
        })
        .collect())
}
