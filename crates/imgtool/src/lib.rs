//! Host-side helpers for producing what the kernel boots: flat user images
//! and TAR disk images.

pub mod elf;
pub use elf::{parse_elf_from_bytes, ElfInfo, LoadSegment};

pub mod disk;
pub use disk::{build_disk, list_disk, DiskEntry};
