use core::arch::asm;

#[inline(always)]
pub fn read_scause() -> u32 {
    let value: u32;
    unsafe { asm!("csrr {0}, scause", out(reg) value) };
    value
}

#[inline(always)]
pub fn read_stval() -> u32 {
    let value: u32;
    unsafe { asm!("csrr {0}, stval", out(reg) value) };
    value
}

#[inline(always)]
pub fn read_sepc() -> u32 {
    let value: u32;
    unsafe { asm!("csrr {0}, sepc", out(reg) value) };
    value
}

#[inline(always)]
pub fn write_sepc(value: u32) {
    unsafe { asm!("csrw sepc, {0}", in(reg) value) };
}

#[inline(always)]
pub fn write_stvec(value: usize) {
    unsafe { asm!("csrw stvec, {0}", in(reg) value) };
}

#[inline(always)]
pub fn write_sscratch(value: usize) {
    unsafe { asm!("csrw sscratch, {0}", in(reg) value) };
}

#[inline(always)]
pub fn write_satp(value: u32) {
    unsafe { asm!("csrw satp, {0}", in(reg) value) };
}

#[inline(always)]
pub fn sfence_vma() {
    unsafe { asm!("sfence.vma zero, zero") };
}

#[inline(always)]
pub fn wfi() {
    unsafe { asm!("wfi") };
}
