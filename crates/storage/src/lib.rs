#![no_std]

//! Flat-file store persisted as a TAR image on a sector-addressed block
//! device.
//!
//! The store keeps every file in memory. Mounting parses the whole image once;
//! flushing rebuilds the image from scratch and rewrites every sector. There
//! are no directories and the file set is fixed by what the image held at
//! mount time (or what a host tool put there).

#[cfg(feature = "std")]
extern crate std;

pub mod block;
pub use block::{BlockDevice, SECTOR_SIZE};
#[cfg(feature = "std")]
pub use block::MemDisk;

pub mod error;
pub use error::FsError;

pub mod tar;

pub mod fs;
pub use fs::{File, FileStore, DISK_MAX_SIZE, FILES_MAX, FILE_DATA_MAX, FILE_NAME_MAX};
