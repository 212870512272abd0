use storage::BlockDevice;

use crate::{Console, Hart, Kernel, PhysMemory};

impl<H, M, C, D> Kernel<'_, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    pub(super) fn sys_putchar(&mut self, ch: u32) {
        self.console.put(ch as u8);
    }

    /// Blocks the caller, letting other processes run, until a byte arrives.
    pub(super) fn sys_getchar(&mut self) -> u32 {
        self.block_on(|kernel| kernel.console.get()) as u32
    }
}
