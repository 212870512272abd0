use types::{USER_BASE, VIRTIO_BLK_PADDR};

/// Compile-time kernel parameters.
pub struct Config;

impl Config {
    /// Slots in the process table, idle included.
    pub const PROCS_MAX: usize = 8;
    /// Per-process kernel stack, holding trap frames and switch frames.
    pub const KERNEL_STACK_SIZE: usize = 8 * 1024;
    /// Virtual address user images are loaded at and entered from.
    pub const USER_BASE: u32 = USER_BASE;
    /// Physical address of the virtio-blk MMIO window.
    pub const VIRTIO_BLK_PADDR: u32 = VIRTIO_BLK_PADDR;
    /// Descriptors in the virtio request queue.
    pub const VIRTQ_ENTRY_NUM: usize = 16;
}
