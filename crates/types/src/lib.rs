#![no_std]

//! Definitions shared by the kernel, the user runtime, and host tools.
//!
//! Everything here is plain data or pure functions so both sides of the
//! user/kernel boundary (and the host image tool) agree on numbers and layout
//! without depending on each other.

pub mod syscall;
pub use syscall::*;

pub mod layout;
pub use layout::*;

pub mod mmu;
pub use mmu::*;

pub mod result;
pub use result::MapError;
