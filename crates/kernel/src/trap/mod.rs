//! Trap decoding.
//!
//! The entry stub in [`crate::arch::riscv32`] saves the user registers into a
//! [`TrapFrame`] on the process's kernel stack and hands it here together
//! with the cause CSRs. Only system calls are expected; anything else stops
//! the kernel.

use storage::BlockDevice;
use types::{ECALL_INSN_LEN, SCAUSE_ECALL};

use crate::{Console, Hart, Kernel, PhysMemory};

mod frame;
pub use frame::TrapFrame;

/// Cause CSRs sampled at trap entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapInfo {
    pub scause: u32,
    pub stval: u32,
    pub sepc: u32,
}

impl<H, M, C, D> Kernel<'_, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    /// Handle one trap and return the pc user code resumes at.
    ///
    /// `info` stays on the trapping process's kernel stack for the whole
    /// call, so a syscall that yields to other processes still resumes at
    /// the right place.
    pub fn handle_trap(&mut self, frame: &mut TrapFrame, info: TrapInfo) -> u32 {
        if info.scause != SCAUSE_ECALL {
            panic!(
                "unexpected trap scause={:#x}, stval={:#x}, sepc={:#x}",
                info.scause, info.stval, info.sepc
            );
        }
        self.dispatch_syscall(frame);
        info.sepc.wrapping_add(ECALL_INSN_LEN)
    }
}
