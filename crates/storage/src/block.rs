/// Size of one device sector in bytes.
pub const SECTOR_SIZE: usize = 512;

/// Synchronous sector-granular storage.
///
/// Both calls complete before returning. Implementations treat a sector past
/// the end of the device as a fatal condition.
pub trait BlockDevice {
    fn read_sector(&mut self, sector: u32, buf: &mut [u8; SECTOR_SIZE]);
    fn write_sector(&mut self, sector: u32, buf: &[u8; SECTOR_SIZE]);
    /// Device size in sectors.
    fn capacity_sectors(&self) -> u64;
}

impl<T: BlockDevice + ?Sized> BlockDevice for &mut T {
    fn read_sector(&mut self, sector: u32, buf: &mut [u8; SECTOR_SIZE]) {
        (**self).read_sector(sector, buf)
    }

    fn write_sector(&mut self, sector: u32, buf: &[u8; SECTOR_SIZE]) {
        (**self).write_sector(sector, buf)
    }

    fn capacity_sectors(&self) -> u64 {
        (**self).capacity_sectors()
    }
}

#[cfg(feature = "std")]
mod mem_disk {
    use std::vec;
    use std::vec::Vec;

    use super::{BlockDevice, SECTOR_SIZE};

    /// RAM-backed block device used by host tools and tests.
    #[derive(Debug, Clone, Default)]
    pub struct MemDisk {
        bytes: Vec<u8>,
        pub reads: usize,
        pub writes: usize,
    }

    impl MemDisk {
        pub fn new(sectors: usize) -> Self {
            Self::from_image(vec![0u8; sectors * SECTOR_SIZE])
        }

        /// Wrap an existing image, zero-padding it to a whole sector.
        pub fn from_image(mut bytes: Vec<u8>) -> Self {
            let rem = bytes.len() % SECTOR_SIZE;
            if rem != 0 {
                bytes.resize(bytes.len() + SECTOR_SIZE - rem, 0);
            }
            Self {
                bytes,
                reads: 0,
                writes: 0,
            }
        }

        pub fn image(&self) -> &[u8] {
            &self.bytes
        }

        pub fn into_image(self) -> Vec<u8> {
            self.bytes
        }

        fn range(&self, sector: u32) -> core::ops::Range<usize> {
            let start = sector as usize * SECTOR_SIZE;
            if start + SECTOR_SIZE > self.bytes.len() {
                panic!(
                    "sector {} out of range (capacity {} sectors)",
                    sector,
                    self.bytes.len() / SECTOR_SIZE
                );
            }
            start..start + SECTOR_SIZE
        }
    }

    impl BlockDevice for MemDisk {
        fn read_sector(&mut self, sector: u32, buf: &mut [u8; SECTOR_SIZE]) {
            let range = self.range(sector);
            buf.copy_from_slice(&self.bytes[range]);
            self.reads += 1;
        }

        fn write_sector(&mut self, sector: u32, buf: &[u8; SECTOR_SIZE]) {
            let range = self.range(sector);
            self.bytes[range].copy_from_slice(buf);
            self.writes += 1;
        }

        fn capacity_sectors(&self) -> u64 {
            (self.bytes.len() / SECTOR_SIZE) as u64
        }
    }
}

#[cfg(feature = "std")]
pub use mem_disk::MemDisk;
