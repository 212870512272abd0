/// Privileged per-hart state the scheduler drives.
///
/// The riscv32 implementation touches `satp`, `sscratch` and the real stack
/// pointer; host tests substitute a recorder that performs the same stack
/// manipulation on ordinary memory.
pub trait Hart {
    /// Flush the TLB, load `satp`, flush again.
    fn set_address_space(&mut self, satp: u32);

    /// Kernel stack the next trap from user mode should land on (`sscratch`).
    fn set_trap_stack(&mut self, kstack_top: usize);

    /// Address of the trampoline a fresh process first returns into.
    fn user_entry(&self) -> usize;

    /// Save ra and s0-s11 on the current stack, store sp to `*prev_sp`,
    /// load sp from `*next_sp` and restore the registers saved there.
    ///
    /// # Safety
    /// `next_sp` must hold a stack pointer produced by a previous switch or
    /// a seeded [`SwitchFrame`](crate::process::SwitchFrame); both pointers
    /// must stay valid until the switch returns.
    unsafe fn switch_context(&mut self, prev_sp: *mut usize, next_sp: *const usize);
}
