use types::align_up;

use crate::tar::{self, TAR_HEADER_SIZE};
use crate::{BlockDevice, FsError, SECTOR_SIZE};

pub const FILES_MAX: usize = 2;
pub const FILE_DATA_MAX: usize = 1024;
pub const FILE_NAME_MAX: usize = 100;

/// Bytes of the device the store owns: every slot at full size.
pub const DISK_MAX_SIZE: usize = align_up(FILES_MAX * (TAR_HEADER_SIZE + FILE_DATA_MAX), SECTOR_SIZE);

/// One in-memory file with a fixed-capacity buffer.
#[derive(Clone)]
pub struct File {
    in_use: bool,
    name: [u8; FILE_NAME_MAX],
    name_len: usize,
    data: [u8; FILE_DATA_MAX],
    size: usize,
}

impl File {
    const EMPTY: File = File {
        in_use: false,
        name: [0; FILE_NAME_MAX],
        name_len: 0,
        data: [0; FILE_DATA_MAX],
        size: 0,
    };

    pub fn name(&self) -> &[u8] {
        &self.name[..self.name_len]
    }

    /// Bytes currently stored.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest size a file may hold.
    pub const fn capacity(&self) -> usize {
        FILE_DATA_MAX
    }

    /// The stored contents, `size` bytes long.
    pub fn contents(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Replace the contents and size.
    pub fn overwrite(&mut self, data: &[u8]) -> Result<(), FsError> {
        if data.len() > FILE_DATA_MAX {
            return Err(FsError::DataTooLarge(data.len()));
        }
        self.data[..data.len()].copy_from_slice(data);
        self.size = data.len();
        Ok(())
    }
}

impl core::fmt::Debug for File {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("File")
            .field("name", &core::str::from_utf8(self.name()).unwrap_or("<non-utf8>"))
            .field("size", &self.size)
            .finish()
    }
}

/// Fixed table of in-memory files mirrored to a TAR image.
pub struct FileStore {
    files: [File; FILES_MAX],
    /// Scratch image reused by mount and flush.
    image: [u8; DISK_MAX_SIZE],
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub const fn new() -> Self {
        Self {
            files: [File::EMPTY; FILES_MAX],
            image: [0; DISK_MAX_SIZE],
        }
    }

    /// Read the first `DISK_MAX_SIZE` bytes of `disk` and load every file.
    ///
    /// Returns how many files were found.
    pub fn mount<D: BlockDevice + ?Sized>(&mut self, disk: &mut D) -> Result<usize, FsError> {
        let mut sector = [0u8; SECTOR_SIZE];
        for (index, chunk) in self.image.chunks_mut(SECTOR_SIZE).enumerate() {
            disk.read_sector(index as u32, &mut sector);
            chunk.copy_from_slice(&sector[..chunk.len()]);
        }
        Self::parse_into(&mut self.files, &self.image)
    }

    /// Replace the file table with the contents of a TAR image.
    pub fn load_image(&mut self, image: &[u8]) -> Result<usize, FsError> {
        Self::parse_into(&mut self.files, image)
    }

    /// Serialize every in-use file into `out`, returning the bytes used.
    ///
    /// `out` is zeroed first; it must hold at least `DISK_MAX_SIZE` bytes.
    pub fn encode_image(&self, out: &mut [u8]) -> Result<usize, FsError> {
        Self::serialize(&self.files, out)
    }

    /// Rewrite the whole store to `disk`. Returns the number of bytes written.
    pub fn flush<D: BlockDevice + ?Sized>(&mut self, disk: &mut D) -> usize {
        // Every file fits its slot, so the image cannot overflow.
        if let Err(err) = Self::serialize(&self.files, &mut self.image) {
            panic!("fs: flush failed: {}", err);
        }

        let mut sector = [0u8; SECTOR_SIZE];
        for (index, chunk) in self.image.chunks(SECTOR_SIZE).enumerate() {
            sector[..chunk.len()].copy_from_slice(chunk);
            disk.write_sector(index as u32, &sector);
        }
        DISK_MAX_SIZE
    }

    fn parse_into(files: &mut [File; FILES_MAX], image: &[u8]) -> Result<usize, FsError> {
        *files = [File::EMPTY; FILES_MAX];
        let mut offset = 0;
        let mut count = 0;
        while let Some((entry, next)) = tar::read_entry(image, offset)? {
            if count == FILES_MAX {
                break;
            }
            Self::claim_slot(files, entry.name, entry.data)?;
            count += 1;
            offset = next;
        }
        Ok(count)
    }

    fn serialize(files: &[File; FILES_MAX], out: &mut [u8]) -> Result<usize, FsError> {
        out.fill(0);
        let mut offset = 0;
        for file in files.iter().filter(|f| f.in_use) {
            offset = tar::write_entry(out, offset, file.name(), file.contents())?;
        }
        Ok(offset)
    }

    fn claim_slot<'a>(
        files: &'a mut [File; FILES_MAX],
        name: &[u8],
        data: &[u8],
    ) -> Result<&'a mut File, FsError> {
        if name.len() >= FILE_NAME_MAX {
            return Err(FsError::NameTooLong(name.len()));
        }
        if data.len() > FILE_DATA_MAX {
            return Err(FsError::DataTooLarge(data.len()));
        }
        let slot = files
            .iter_mut()
            .find(|f| !f.in_use)
            .ok_or(FsError::TableFull)?;
        *slot = File::EMPTY;
        slot.in_use = true;
        slot.name[..name.len()].copy_from_slice(name);
        slot.name_len = name.len();
        slot.overwrite(data)?;
        Ok(slot)
    }

    /// Find a file by exact name.
    pub fn lookup(&mut self, name: &[u8]) -> Option<&mut File> {
        self.files.iter_mut().find(|f| f.in_use && f.name() == name)
    }

    pub fn get(&self, name: &[u8]) -> Option<&File> {
        self.files.iter().find(|f| f.in_use && f.name() == name)
    }

    /// Occupy a free slot with a new file.
    pub fn insert(&mut self, name: &[u8], data: &[u8]) -> Result<&mut File, FsError> {
        if self.get(name).is_some() {
            return Err(FsError::Exists);
        }
        Self::claim_slot(&mut self.files, name, data)
    }

    pub fn iter(&self) -> impl Iterator<Item = &File> {
        self.files.iter().filter(|f| f.in_use)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
