//! Process table.
//!
//! A fixed array of slots. A slot moves `Unused -> Runnable -> Exited` and is
//! never reused; pids come from a counter that only grows. The idle process
//! is pid 0 and runs on the boot stack, so its saved stack pointer is filled
//! in by the first switch away from it.

use core::fmt;

use crate::Config;

pub mod context;
pub use context::SwitchFrame;

mod scheduler;

const PROCS_MAX: usize = Config::PROCS_MAX;
const KERNEL_STACK_SIZE: usize = Config::KERNEL_STACK_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u32);

impl Pid {
    pub const IDLE: Pid = Pid(0);
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    Unused,
    Runnable,
    Exited,
}

#[repr(C, align(16))]
struct KernelStack([u8; KERNEL_STACK_SIZE]);

pub struct Process {
    pid: Pid,
    state: ProcessState,
    /// Kernel stack pointer saved by the last switch away from this process.
    sp: usize,
    /// Physical address of the Sv32 root table.
    page_table: u32,
    stack: KernelStack,
}

impl Process {
    const UNUSED: Process = Process {
        pid: Pid::IDLE,
        state: ProcessState::Unused,
        sp: 0,
        page_table: 0,
        stack: KernelStack([0; KERNEL_STACK_SIZE]),
    };

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn saved_sp(&self) -> usize {
        self.sp
    }

    pub fn page_table(&self) -> u32 {
        self.page_table
    }

    pub fn kernel_stack_base(&self) -> usize {
        self.stack.0.as_ptr() as usize
    }

    pub fn kernel_stack_top(&self) -> usize {
        self.kernel_stack_base() + KERNEL_STACK_SIZE
    }

    pub fn is_idle(&self) -> bool {
        self.state != ProcessState::Unused && self.pid == Pid::IDLE
    }

    /// Seed the stack so the first switch into this process pops `frame`.
    fn seed(&mut self, frame: &SwitchFrame) {
        let offset = KERNEL_STACK_SIZE - SwitchFrame::SIZE;
        frame.write_to(&mut self.stack.0[offset..]);
        self.sp = self.kernel_stack_base() + offset;
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("state", &self.state)
            .field("sp", &format_args!("{:#x}", self.sp))
            .field("page_table", &format_args!("{:#x}", self.page_table))
            .finish()
    }
}

pub struct ProcessTable {
    procs: [Process; PROCS_MAX],
    current: usize,
    idle: Option<usize>,
    next_pid: u32,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable {
    pub const fn new() -> Self {
        Self {
            procs: [Process::UNUSED; PROCS_MAX],
            current: 0,
            idle: None,
            next_pid: 1,
        }
    }

    pub fn current(&self) -> &Process {
        &self.procs[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn idle_index(&self) -> Option<usize> {
        self.idle
    }

    pub fn get(&self, index: usize) -> Option<&Process> {
        self.procs.get(index)
    }

    pub fn find(&self, pid: Pid) -> Option<&Process> {
        self.procs
            .iter()
            .find(|p| p.state != ProcessState::Unused && p.pid == pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.procs.iter()
    }

    /// Slot the next yield from the current process would switch to.
    ///
    /// Scans every slot once starting after the current one, so the current
    /// process is considered last. Idle wins only when nothing else is
    /// runnable.
    pub fn pick_next(&self) -> usize {
        (1..=PROCS_MAX)
            .map(|offset| (self.current + offset) % PROCS_MAX)
            .find(|&i| self.procs[i].state == ProcessState::Runnable && !self.procs[i].is_idle())
            .or(self.idle)
            .unwrap_or(self.current)
    }

    fn claim_slot(&mut self) -> usize {
        match self.procs.iter().position(|p| p.state == ProcessState::Unused) {
            Some(index) => index,
            None => panic!("no free process slots"),
        }
    }

    fn install(&mut self, index: usize, pid: Pid, page_table: u32) -> &mut Process {
        let proc = &mut self.procs[index];
        proc.pid = pid;
        proc.state = ProcessState::Runnable;
        proc.page_table = page_table;
        proc.sp = 0;
        proc
    }

    fn alloc_pid(&mut self) -> Pid {
        let pid = Pid(self.next_pid);
        self.next_pid += 1;
        pid
    }

    fn mark_current_exited(&mut self) {
        self.procs[self.current].state = ProcessState::Exited;
    }
}
