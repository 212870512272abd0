//! Trap entry, context switch, and the first return to user mode.

use core::arch::global_asm;

use types::{SSTATUS_SPIE, SSTATUS_SUM, USER_BASE};

use crate::trap::TrapFrame;

unsafe extern "C" {
    /// Trap vector written to `stvec`. Calls `kernel_trap(frame)`, which the
    /// boot binary defines.
    pub fn kernel_entry();
    /// Where a fresh process lands after its first context switch.
    pub fn user_entry();
    pub fn switch_context(prev_sp: *mut usize, next_sp: *const usize);
}

// The frame region is rounded up to 32 words to keep sp 16-byte aligned;
// the TrapFrame itself occupies the low 31.
global_asm!(
    ".section .text",
    ".balign 4",
    ".globl kernel_entry",
    "kernel_entry:",
    "    csrrw sp, sscratch, sp",
    "    addi sp, sp, -{frame}",
    "    sw ra,  4 * 0(sp)",
    "    sw gp,  4 * 1(sp)",
    "    sw tp,  4 * 2(sp)",
    "    sw t0,  4 * 3(sp)",
    "    sw t1,  4 * 4(sp)",
    "    sw t2,  4 * 5(sp)",
    "    sw t3,  4 * 6(sp)",
    "    sw t4,  4 * 7(sp)",
    "    sw t5,  4 * 8(sp)",
    "    sw t6,  4 * 9(sp)",
    "    sw a0,  4 * 10(sp)",
    "    sw a1,  4 * 11(sp)",
    "    sw a2,  4 * 12(sp)",
    "    sw a3,  4 * 13(sp)",
    "    sw a4,  4 * 14(sp)",
    "    sw a5,  4 * 15(sp)",
    "    sw a6,  4 * 16(sp)",
    "    sw a7,  4 * 17(sp)",
    "    sw s0,  4 * 18(sp)",
    "    sw s1,  4 * 19(sp)",
    "    sw s2,  4 * 20(sp)",
    "    sw s3,  4 * 21(sp)",
    "    sw s4,  4 * 22(sp)",
    "    sw s5,  4 * 23(sp)",
    "    sw s6,  4 * 24(sp)",
    "    sw s7,  4 * 25(sp)",
    "    sw s8,  4 * 26(sp)",
    "    sw s9,  4 * 27(sp)",
    "    sw s10, 4 * 28(sp)",
    "    sw s11, 4 * 29(sp)",
    // User sp was parked in sscratch by the swap above.
    "    csrr a0, sscratch",
    "    sw a0, 4 * 30(sp)",
    // Next trap from user mode starts from the top of this stack again.
    "    addi a0, sp, {frame}",
    "    csrw sscratch, a0",
    "    mv a0, sp",
    "    call kernel_trap",
    "    lw ra,  4 * 0(sp)",
    "    lw gp,  4 * 1(sp)",
    "    lw tp,  4 * 2(sp)",
    "    lw t0,  4 * 3(sp)",
    "    lw t1,  4 * 4(sp)",
    "    lw t2,  4 * 5(sp)",
    "    lw t3,  4 * 6(sp)",
    "    lw t4,  4 * 7(sp)",
    "    lw t5,  4 * 8(sp)",
    "    lw t6,  4 * 9(sp)",
    "    lw a0,  4 * 10(sp)",
    "    lw a1,  4 * 11(sp)",
    "    lw a2,  4 * 12(sp)",
    "    lw a3,  4 * 13(sp)",
    "    lw a4,  4 * 14(sp)",
    "    lw a5,  4 * 15(sp)",
    "    lw a6,  4 * 16(sp)",
    "    lw a7,  4 * 17(sp)",
    "    lw s0,  4 * 18(sp)",
    "    lw s1,  4 * 19(sp)",
    "    lw s2,  4 * 20(sp)",
    "    lw s3,  4 * 21(sp)",
    "    lw s4,  4 * 22(sp)",
    "    lw s5,  4 * 23(sp)",
    "    lw s6,  4 * 24(sp)",
    "    lw s7,  4 * 25(sp)",
    "    lw s8,  4 * 26(sp)",
    "    lw s9,  4 * 27(sp)",
    "    lw s10, 4 * 28(sp)",
    "    lw s11, 4 * 29(sp)",
    "    lw sp,  4 * 30(sp)",
    "    sret",
    frame = const FRAME_RESERVED,
);

const FRAME_RESERVED: usize = (TrapFrame::WORDS + 1) * 4;

global_asm!(
    ".section .text",
    ".balign 4",
    ".globl switch_context",
    "switch_context:",
    "    addi sp, sp, -13 * 4",
    "    sw ra,  0  * 4(sp)",
    "    sw s0,  1  * 4(sp)",
    "    sw s1,  2  * 4(sp)",
    "    sw s2,  3  * 4(sp)",
    "    sw s3,  4  * 4(sp)",
    "    sw s4,  5  * 4(sp)",
    "    sw s5,  6  * 4(sp)",
    "    sw s6,  7  * 4(sp)",
    "    sw s7,  8  * 4(sp)",
    "    sw s8,  9  * 4(sp)",
    "    sw s9,  10 * 4(sp)",
    "    sw s10, 11 * 4(sp)",
    "    sw s11, 12 * 4(sp)",
    "    sw sp, (a0)",
    "    lw sp, (a1)",
    "    lw ra,  0  * 4(sp)",
    "    lw s0,  1  * 4(sp)",
    "    lw s1,  2  * 4(sp)",
    "    lw s2,  3  * 4(sp)",
    "    lw s3,  4  * 4(sp)",
    "    lw s4,  5  * 4(sp)",
    "    lw s5,  6  * 4(sp)",
    "    lw s6,  7  * 4(sp)",
    "    lw s7,  8  * 4(sp)",
    "    lw s8,  9  * 4(sp)",
    "    lw s9,  10 * 4(sp)",
    "    lw s10, 11 * 4(sp)",
    "    lw s11, 12 * 4(sp)",
    "    addi sp, sp, 13 * 4",
    "    ret",
);

global_asm!(
    ".section .text",
    ".balign 4",
    ".globl user_entry",
    "user_entry:",
    "    li t0, {user_base}",
    "    csrw sepc, t0",
    "    li t0, {sstatus}",
    "    csrw sstatus, t0",
    "    sret",
    user_base = const USER_BASE,
    sstatus = const SSTATUS_SPIE | SSTATUS_SUM,
);
