use storage::tar::{self, TAR_HEADER_SIZE};
use storage::{BlockDevice, FileStore, FsError, DISK_MAX_SIZE, FILE_DATA_MAX, SECTOR_SIZE};

/// Sector-counting disk kept local so these tests run without the `std` feature.
struct VecDisk {
    bytes: Vec<u8>,
    writes: Vec<u32>,
}

impl VecDisk {
    fn new(sectors: usize) -> Self {
        Self {
            bytes: vec![0; sectors * SECTOR_SIZE],
            writes: Vec::new(),
        }
    }

    fn with_image(image: &[u8], sectors: usize) -> Self {
        let mut disk = Self::new(sectors);
        disk.bytes[..image.len()].copy_from_slice(image);
        disk
    }
}

impl BlockDevice for VecDisk {
    fn read_sector(&mut self, sector: u32, buf: &mut [u8; SECTOR_SIZE]) {
        let start = sector as usize * SECTOR_SIZE;
        buf.copy_from_slice(&self.bytes[start..start + SECTOR_SIZE]);
    }

    fn write_sector(&mut self, sector: u32, buf: &[u8; SECTOR_SIZE]) {
        let start = sector as usize * SECTOR_SIZE;
        self.bytes[start..start + SECTOR_SIZE].copy_from_slice(buf);
        self.writes.push(sector);
    }

    fn capacity_sectors(&self) -> u64 {
        (self.bytes.len() / SECTOR_SIZE) as u64
    }
}

fn image_with(files: &[(&[u8], &[u8])]) -> Vec<u8> {
    let mut store = FileStore::new();
    for (name, data) in files {
        store.insert(name, data).unwrap();
    }
    let mut image = vec![0u8; DISK_MAX_SIZE];
    store.encode_image(&mut image).unwrap();
    image
}

#[test]
fn test_mount_reads_every_file() {
    let image = image_with(&[(b"hello.txt", b"Can you see me?\n"), (b"meow.txt", b"meow")]);
    let mut disk = VecDisk::with_image(&image, 20);

    let mut store = FileStore::new();
    assert_eq!(store.mount(&mut disk).unwrap(), 2);
    assert_eq!(store.get(b"hello.txt").unwrap().contents(), b"Can you see me?\n");
    assert_eq!(store.get(b"meow.txt").unwrap().contents(), b"meow");
    assert!(store.get(b"missing.txt").is_none());
}

#[test]
fn test_empty_disk_mounts_no_files() {
    let mut disk = VecDisk::new(20);
    let mut store = FileStore::new();
    assert_eq!(store.mount(&mut disk).unwrap(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_flush_then_remount_reconstructs_contents() {
    let image = image_with(&[(b"test.txt", b"old contents"), (b"other.txt", b"keep")]);
    let mut disk = VecDisk::with_image(&image, 20);
    let mut store = FileStore::new();
    store.mount(&mut disk).unwrap();

    store.lookup(b"test.txt").unwrap().overwrite(b"hi").unwrap();
    let written = store.flush(&mut disk);
    assert_eq!(written, DISK_MAX_SIZE);
    assert_eq!(disk.writes.len(), DISK_MAX_SIZE / SECTOR_SIZE);

    let mut restarted = FileStore::new();
    assert_eq!(restarted.mount(&mut disk).unwrap(), 2);
    assert_eq!(restarted.get(b"test.txt").unwrap().contents(), b"hi");
    assert_eq!(restarted.get(b"other.txt").unwrap().contents(), b"keep");
}

#[test]
fn test_full_size_files_fit_the_disk_window() {
    let big = vec![b'x'; FILE_DATA_MAX];
    let image = image_with(&[(b"a", &big), (b"b", &big)]);
    let mut disk = VecDisk::with_image(&image, DISK_MAX_SIZE / SECTOR_SIZE);
    let mut store = FileStore::new();
    assert_eq!(store.mount(&mut disk).unwrap(), 2);
    assert_eq!(store.get(b"b").unwrap().size(), FILE_DATA_MAX);
}

#[test]
fn test_bad_magic_is_rejected() {
    let mut image = image_with(&[(b"hello.txt", b"x")]);
    image[257..262].copy_from_slice(b"xxxxx");
    let mut store = FileStore::new();
    assert_eq!(store.load_image(&image), Err(FsError::BadMagic { offset: 0 }));
}

#[test]
fn test_bad_checksum_is_rejected() {
    let mut image = image_with(&[(b"hello.txt", b"x")]);
    image[TAR_HEADER_SIZE] = b'y'; // data is not covered by the checksum
    image[10] = b'z';
    let mut store = FileStore::new();
    assert_eq!(store.load_image(&image), Err(FsError::BadChecksum { offset: 0 }));
}

#[test]
fn test_insert_limits() {
    let mut store = FileStore::new();
    store.insert(b"a", b"1").unwrap();
    assert_eq!(store.insert(b"a", b"2").unwrap_err(), FsError::Exists);
    store.insert(b"b", b"2").unwrap();
    assert_eq!(store.insert(b"c", b"3").unwrap_err(), FsError::TableFull);

    let mut store = FileStore::new();
    let long_name = vec![b'n'; 100];
    assert_eq!(store.insert(&long_name, b"").unwrap_err(), FsError::NameTooLong(100));
    let too_big = vec![0u8; FILE_DATA_MAX + 1];
    assert_eq!(
        store.insert(b"big", &too_big).unwrap_err(),
        FsError::DataTooLarge(FILE_DATA_MAX + 1)
    );
}

#[test]
fn test_second_entry_starts_on_sector_boundary() {
    let image = image_with(&[(b"one", &[1u8; 600]), (b"two", b"2")]);
    let (first, next) = tar::read_entry(&image, 0).unwrap().unwrap();
    assert_eq!(first.name, b"one");
    assert_eq!(next, tar::entry_len(600));
    assert_eq!(next % SECTOR_SIZE, 0);
    let (second, _) = tar::read_entry(&image, next).unwrap().unwrap();
    assert_eq!(second.name, b"two");
    assert_eq!(second.data, b"2");
}
