use storage::{BlockDevice, FileStore};
use types::MemoryLayout;

use crate::log::Bytes;
use crate::{Console, Hart, Mmu, PhysMemory, ProcessTable, logf};

/// Everything the trap path and scheduler operate on.
///
/// The boot binary keeps exactly one of these in a static; host tests build
/// their own around fake hardware.
pub struct Kernel<'k, H, M, C, D> {
    pub(crate) procs: &'k mut ProcessTable,
    pub(crate) hart: H,
    pub(crate) mmu: Mmu<M>,
    pub(crate) console: C,
    pub(crate) fs: FileStore,
    pub(crate) disk: D,
    pub(crate) layout: MemoryLayout,
}

impl<'k, H, M, C, D> Kernel<'k, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    pub fn new(
        procs: &'k mut ProcessTable,
        hart: H,
        mmu: Mmu<M>,
        console: C,
        disk: D,
        layout: MemoryLayout,
    ) -> Self {
        Self {
            procs,
            hart,
            mmu,
            console,
            fs: FileStore::new(),
            disk,
            layout,
        }
    }

    /// Load the file store from disk. A corrupt image is fatal.
    pub fn mount_fs(&mut self) {
        if let Err(err) = self.fs.mount(&mut self.disk) {
            panic!("fs: {}", err);
        }
        for file in self.fs.iter() {
            logf!("file: {}, size={}", Bytes(file.name()), file.size());
        }
    }

    pub fn procs(&self) -> &ProcessTable {
        self.procs
    }

    pub fn hart(&self) -> &H {
        &self.hart
    }

    pub fn hart_mut(&mut self) -> &mut H {
        &mut self.hart
    }

    pub fn mmu(&self) -> &Mmu<M> {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu<M> {
        &mut self.mmu
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn fs(&self) -> &FileStore {
        &self.fs
    }

    pub fn fs_mut(&mut self) -> &mut FileStore {
        &mut self.fs
    }

    pub fn disk(&self) -> &D {
        &self.disk
    }

    pub fn disk_mut(&mut self) -> &mut D {
        &mut self.disk
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }
}
