use storage::BlockDevice;

use crate::{Console, Hart, Kernel, PhysMemory};

impl<H, M, C, D> Kernel<'_, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    pub(super) fn sys_exit(&mut self) -> ! {
        self.exit_current()
    }
}
