//! Target-specific glue. Only this module contains inline assembly.

#[cfg(target_arch = "riscv32")]
pub mod riscv32;
