#![no_std]

//! Cooperative single-hart kernel core.
//!
//! Everything that touches CSRs, raw registers or MMIO lives in
//! [`arch::riscv32`]; the rest of the crate works against the [`Hart`],
//! [`Console`], [`PhysMemory`] and [`Mmio`] traits so it runs unchanged in
//! host tests.

pub mod log;

pub mod config;
pub use config::Config;

pub mod global;
pub use global::Global;

pub mod console;
pub use console::Console;

pub mod hart;
pub use hart::Hart;

pub mod mmu;
pub use mmu::{Mmu, PageAllocator, PhysMemory};

pub mod process;
pub use process::{Pid, Process, ProcessState, ProcessTable};

pub mod trap;
pub use trap::{TrapFrame, TrapInfo};

pub mod syscall;

pub mod virtio;
pub use virtio::{Mmio, VirtioBlk};

mod kernel;
pub use kernel::Kernel;

pub mod arch;
