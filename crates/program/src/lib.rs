#![no_std]

//! User-mode runtime: system call wrappers, console printing, the program
//! entry point, and the interactive shell.

pub mod syscall;
pub use syscall::{Kernel, Sys};

#[macro_use]
pub mod io;

#[macro_use] // enables macro use across the crate
pub mod entrypoint;

pub mod panic;

pub mod shell;
