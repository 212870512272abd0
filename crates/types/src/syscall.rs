//! System call numbers and register conventions.
//!
//! The call id travels in `a3`, up to three arguments in `a0..a2`, and the
//! result comes back in `a0`.

pub const SYS_PUTCHAR: u32 = 1;
pub const SYS_GETCHAR: u32 = 2;
pub const SYS_EXIT: u32 = 3;
pub const SYS_READFILE: u32 = 4;
pub const SYS_WRITEFILE: u32 = 5;

/// Returned in `a0` when a file call fails (`-1` as seen by user code).
pub const SYSCALL_ERROR: u32 = u32::MAX;

/// Width of the `ecall` instruction; the kernel resumes user code past it.
pub const ECALL_INSN_LEN: u32 = 4;
