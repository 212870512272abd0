use storage::BlockDevice;
use types::satp_for_root;

use super::{Pid, SwitchFrame};
use crate::mmu::PagePerms;
use crate::{Config, Console, Hart, Kernel, PhysMemory, logf};

impl<H, M, C, D> Kernel<'_, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    /// Make the calling boot context the idle process (pid 0).
    ///
    /// Idle has an address space but no user image; its stack pointer is
    /// captured by the first switch away from it.
    pub fn spawn_idle(&mut self) -> Pid {
        if self.procs.idle.is_some() {
            panic!("idle process already exists");
        }
        let slot = self.procs.claim_slot();
        let root = self.new_address_space();
        self.procs.install(slot, Pid::IDLE, root);
        self.procs.idle = Some(slot);
        self.procs.current = slot;
        logf!("created idle process (slot {})", slot);
        Pid::IDLE
    }

    /// Create a runnable process whose user image is `image`, loaded at
    /// `USER_BASE`. Panics when every slot is taken.
    pub fn create_process(&mut self, image: &[u8]) -> Pid {
        let slot = self.procs.claim_slot();
        let root = self.new_address_space();
        self.mmu
            .load_image(root, Config::USER_BASE, image, PagePerms::user_rwx());

        let pid = self.procs.alloc_pid();
        let frame = SwitchFrame::first_entry(self.hart.user_entry());
        self.procs.install(slot, pid, root).seed(&frame);
        logf!("created process {} (slot {}, image {} bytes)", pid, slot, image.len());
        pid
    }

    /// Kernel identity window plus the virtio registers; user pages are
    /// added by the caller.
    fn new_address_space(&mut self) -> u32 {
        let root = self.mmu.alloc_pages(1);
        let layout = self.layout;
        self.mmu.identity_map(
            root,
            layout.kernel_base,
            layout.free_ram_end - layout.kernel_base,
            PagePerms::kernel_rwx(),
        );
        self.mmu.map_page(
            root,
            Config::VIRTIO_BLK_PADDR,
            Config::VIRTIO_BLK_PADDR,
            PagePerms::kernel_rw(),
        );
        root
    }

    /// Give up the hart to the next runnable process.
    ///
    /// Returns immediately when the current process is the only candidate;
    /// otherwise returns once some later yield switches back here.
    pub fn yield_now(&mut self) {
        let prev = self.procs.current;
        let next = self.procs.pick_next();
        if next == prev {
            return;
        }

        let next_proc = &self.procs.procs[next];
        self.hart
            .set_address_space(satp_for_root(next_proc.page_table));
        self.hart.set_trap_stack(next_proc.kernel_stack_top());
        self.procs.current = next;

        let prev_sp = &raw mut self.procs.procs[prev].sp;
        let next_sp = &raw const self.procs.procs[next].sp;
        // Both slots live in the process table, which outlives every switch.
        unsafe { self.hart.switch_context(prev_sp, next_sp) };
    }

    /// Poll until `poll` produces a value, yielding between attempts.
    pub fn block_on<T>(&mut self, mut poll: impl FnMut(&mut Self) -> Option<T>) -> T {
        loop {
            if let Some(value) = poll(self) {
                return value;
            }
            self.yield_now();
        }
    }

    /// Mark the running process exited and switch away for good.
    pub fn exit_current(&mut self) -> ! {
        let pid = self.procs.current().pid();
        logf!("process {} exited", pid);
        self.procs.mark_current_exited();
        self.yield_now();
        panic!("unreachable");
    }
}
