//! Machine layout and CSR bits shared by the kernel and user programs.

/// Virtual address every user image is loaded at.
pub const USER_BASE: u32 = 0x0100_0000;

/// Physical address of the virtio-blk MMIO window on the QEMU `virt` board.
pub const VIRTIO_BLK_PADDR: u32 = 0x1000_1000;

/// `scause` value for an environment call from U-mode.
pub const SCAUSE_ECALL: u32 = 8;

/// `sstatus.SPIE`: interrupts enabled after `sret`.
pub const SSTATUS_SPIE: u32 = 1 << 5;
/// `sstatus.SUM`: supervisor may touch user pages.
pub const SSTATUS_SUM: u32 = 1 << 18;

/// Physical memory regions the kernel learns from the linker script.
///
/// `#[repr(C)]` so the boot code can fill it from linker symbols without
/// any translation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryLayout {
    /// First byte of the kernel image; identity-mapped into every process.
    pub kernel_base: u32,
    /// First page handed out by the page allocator.
    pub free_ram: u32,
    /// One past the last allocatable byte.
    pub free_ram_end: u32,
}

impl MemoryLayout {
    pub const fn new(kernel_base: u32, free_ram: u32, free_ram_end: u32) -> Self {
        Self {
            kernel_base,
            free_ram,
            free_ram_end,
        }
    }
}
