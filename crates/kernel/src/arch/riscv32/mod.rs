//! rv32 supervisor-mode implementations of the hardware traits.

mod asm;
pub mod csr;
pub mod sbi;

pub use asm::{kernel_entry, user_entry};

use crate::mmu::PhysMemory;
use crate::trap::TrapInfo;
use crate::{Console, Hart, Mmio};

/// The one hart this kernel runs on.
pub struct Riscv32Hart;

impl Hart for Riscv32Hart {
    fn set_address_space(&mut self, satp: u32) {
        csr::sfence_vma();
        csr::write_satp(satp);
        csr::sfence_vma();
    }

    fn set_trap_stack(&mut self, kstack_top: usize) {
        csr::write_sscratch(kstack_top);
    }

    fn user_entry(&self) -> usize {
        user_entry as usize
    }

    unsafe fn switch_context(&mut self, prev_sp: *mut usize, next_sp: *const usize) {
        unsafe { asm::switch_context(prev_sp, next_sp) }
    }
}

/// Console over the legacy SBI putchar/getchar calls.
pub struct SbiConsole;

impl Console for SbiConsole {
    fn put(&mut self, byte: u8) {
        sbi::console_putchar(byte);
    }

    fn get(&mut self) -> Option<u8> {
        sbi::console_getchar()
    }
}

impl core::fmt::Write for SbiConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// RAM reached through the identity map every address space carries.
pub struct IdentityMemory;

impl PhysMemory for IdentityMemory {
    fn read_u32(&self, paddr: u32) -> u32 {
        unsafe { (paddr as usize as *const u32).read_volatile() }
    }

    fn write_u32(&mut self, paddr: u32, val: u32) {
        unsafe { (paddr as usize as *mut u32).write_volatile(val) }
    }

    fn read_bytes(&self, paddr: u32, out: &mut [u8]) {
        unsafe { core::ptr::copy_nonoverlapping(paddr as usize as *const u8, out.as_mut_ptr(), out.len()) }
    }

    fn write_bytes(&mut self, paddr: u32, data: &[u8]) {
        unsafe { core::ptr::copy_nonoverlapping(data.as_ptr(), paddr as usize as *mut u8, data.len()) }
    }

    fn fill_zero(&mut self, paddr: u32, len: usize) {
        unsafe { core::ptr::write_bytes(paddr as usize as *mut u8, 0, len) }
    }
}

/// Device registers at a fixed physical address.
pub struct MmioRegion {
    base: usize,
}

impl MmioRegion {
    /// # Safety
    /// `base` must be the start of a device register window that is mapped
    /// in every address space the kernel runs under.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl Mmio for MmioRegion {
    fn read32(&self, offset: usize) -> u32 {
        unsafe { ((self.base + offset) as *const u32).read_volatile() }
    }

    fn write32(&mut self, offset: usize, val: u32) {
        unsafe { ((self.base + offset) as *mut u32).write_volatile(val) }
    }
}

/// Cause CSRs for the trap being handled.
pub fn trap_info() -> TrapInfo {
    TrapInfo {
        scause: csr::read_scause(),
        stval: csr::read_stval(),
        sepc: csr::read_sepc(),
    }
}

pub fn halt() -> ! {
    loop {
        csr::wfi();
    }
}
