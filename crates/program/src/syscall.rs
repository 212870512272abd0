use core::ffi::CStr;

use types::{SYS_EXIT, SYS_GETCHAR, SYS_PUTCHAR, SYS_READFILE, SYS_WRITEFILE, SYSCALL_ERROR};

/// Trap into the kernel with `id` in a3 and up to three arguments.
#[cfg(target_arch = "riscv32")]
pub fn syscall(id: u32, arg0: u32, arg1: u32, arg2: u32) -> u32 {
    let ret: u32;
    unsafe {
        core::arch::asm!(
            "ecall",
            inlateout("a0") arg0 => ret,
            in("a1") arg1,
            in("a2") arg2,
            in("a3") id,
        );
    }
    ret
}

#[cfg(not(target_arch = "riscv32"))]
pub fn syscall(_id: u32, _arg0: u32, _arg1: u32, _arg2: u32) -> u32 {
    // For non-RISC-V targets there is no kernel to trap into
    SYSCALL_ERROR
}

pub fn putchar(ch: u8) {
    syscall(SYS_PUTCHAR, ch as u32, 0, 0);
}

/// Blocks until the console has a byte.
pub fn getchar() -> u8 {
    syscall(SYS_GETCHAR, 0, 0, 0) as u8
}

pub fn exit() -> ! {
    syscall(SYS_EXIT, 0, 0, 0);
    unreachable!("exit returned");
}

/// Read up to `buf.len()` bytes of `name`. `None` if the kernel refused.
pub fn readfile(name: &CStr, buf: &mut [u8]) -> Option<usize> {
    let ret = syscall(
        SYS_READFILE,
        name.as_ptr() as usize as u32,
        buf.as_mut_ptr() as usize as u32,
        buf.len() as u32,
    );
    (ret != SYSCALL_ERROR).then_some(ret as usize)
}

/// Replace the contents of `name` with `data`.
pub fn writefile(name: &CStr, data: &[u8]) -> Option<usize> {
    let ret = syscall(
        SYS_WRITEFILE,
        name.as_ptr() as usize as u32,
        data.as_ptr() as usize as u32,
        data.len() as u32,
    );
    (ret != SYSCALL_ERROR).then_some(ret as usize)
}

/// The calls a program makes into the kernel.
pub trait Sys {
    fn putchar(&mut self, ch: u8);
    fn getchar(&mut self) -> u8;
    fn readfile(&mut self, name: &CStr, buf: &mut [u8]) -> Option<usize>;
    fn writefile(&mut self, name: &CStr, data: &[u8]) -> Option<usize>;

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.putchar(b);
        }
    }
}

/// The running kernel, reached through `ecall`.
pub struct Kernel;

impl Sys for Kernel {
    fn putchar(&mut self, ch: u8) {
        putchar(ch);
    }

    fn getchar(&mut self) -> u8 {
        getchar()
    }

    fn readfile(&mut self, name: &CStr, buf: &mut [u8]) -> Option<usize> {
        readfile(name, buf)
    }

    fn writefile(&mut self, name: &CStr, data: &[u8]) -> Option<usize> {
        writefile(name, data)
    }
}
