//! System call dispatch. The id arrives in a3, arguments in a0..a2, and the
//! result (when there is one) goes back in a0.

use storage::BlockDevice;
use types::{SYS_EXIT, SYS_GETCHAR, SYS_PUTCHAR, SYS_READFILE, SYS_WRITEFILE};

use crate::{Console, Hart, Kernel, PhysMemory, TrapFrame};

mod console;
mod file;
mod process;

impl<H, M, C, D> Kernel<'_, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    pub fn dispatch_syscall(&mut self, frame: &mut TrapFrame) {
        match frame.a3 {
            SYS_PUTCHAR => self.sys_putchar(frame.a0),
            SYS_GETCHAR => frame.a0 = self.sys_getchar(),
            SYS_EXIT => self.sys_exit(),
            SYS_READFILE => frame.a0 = self.sys_readfile(frame.a0, frame.a1, frame.a2),
            SYS_WRITEFILE => frame.a0 = self.sys_writefile(frame.a0, frame.a1, frame.a2),
            id => panic!("unexpected syscall a3={:#x}", id),
        }
    }
}
