#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use kernel::process::SwitchFrame;
use kernel::{Console, Hart, Kernel, Mmu, PageAllocator, PhysMemory, Pid, ProcessTable, TrapFrame, TrapInfo};
use storage::{DISK_MAX_SIZE, FileStore, MemDisk};
use types::{MemoryLayout, SCAUSE_ECALL, SV32_PAGE_SIZE, USER_BASE};

pub const LAYOUT: MemoryLayout = MemoryLayout::new(0x8020_0000, 0x8030_0000, 0x8040_0000);

/// Fake address of the user-entry trampoline.
pub const USER_ENTRY: usize = 0x8020_1000;

/// Pages in the zero-filled image used for test processes.
pub const USER_IMAGE_PAGES: usize = 2;

pub type TestKernel<'k> = Kernel<'k, SimHart, SimRam, ScriptedConsole, MemDisk>;

/// Physical RAM covering the allocator's range.
pub struct SimRam {
    base: u32,
    bytes: Vec<u8>,
}

impl SimRam {
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            base: layout.free_ram,
            bytes: vec![0; (layout.free_ram_end - layout.free_ram) as usize],
        }
    }

    fn offset(&self, paddr: u32, len: usize) -> usize {
        let off = paddr
            .checked_sub(self.base)
            .unwrap_or_else(|| panic!("paddr {:#x} below simulated RAM", paddr)) as usize;
        assert!(off + len <= self.bytes.len(), "paddr {:#x}+{} past simulated RAM", paddr, len);
        off
    }
}

impl PhysMemory for SimRam {
    fn read_u32(&self, paddr: u32) -> u32 {
        let off = self.offset(paddr, 4);
        u32::from_le_bytes(self.bytes[off..off + 4].try_into().unwrap())
    }

    fn write_u32(&mut self, paddr: u32, val: u32) {
        let off = self.offset(paddr, 4);
        self.bytes[off..off + 4].copy_from_slice(&val.to_le_bytes());
    }

    fn read_bytes(&self, paddr: u32, out: &mut [u8]) {
        let off = self.offset(paddr, out.len());
        out.copy_from_slice(&self.bytes[off..off + out.len()]);
    }

    fn write_bytes(&mut self, paddr: u32, data: &[u8]) {
        let off = self.offset(paddr, data.len());
        self.bytes[off..off + data.len()].copy_from_slice(data);
    }

    fn fill_zero(&mut self, paddr: u32, len: usize) {
        let off = self.offset(paddr, len);
        self.bytes[off..off + len].fill(0);
    }
}

/// Records privileged state and runs the real switch algorithm on host
/// memory: the live callee-saved registers are pushed onto the current
/// stack, the stack pointers are swapped, and the next frame is popped.
pub struct SimHart {
    pub regs: SwitchFrame,
    pub sp: usize,
    pub satp_history: Vec<u32>,
    pub trap_stack: Option<usize>,
    pub switches: usize,
    boot_stack: Box<[usize; 64]>,
}

impl SimHart {
    pub fn new() -> Self {
        let boot_stack = Box::new([0usize; 64]);
        let sp = boot_stack.as_ptr() as usize + std::mem::size_of_val(&*boot_stack);
        Self {
            regs: SwitchFrame::default(),
            sp,
            satp_history: Vec::new(),
            trap_stack: None,
            switches: 0,
            boot_stack,
        }
    }

    pub fn boot_stack_top(&self) -> usize {
        self.boot_stack.as_ptr() as usize + std::mem::size_of_val(&*self.boot_stack)
    }
}

impl Hart for SimHart {
    fn set_address_space(&mut self, satp: u32) {
        self.satp_history.push(satp);
    }

    fn set_trap_stack(&mut self, kstack_top: usize) {
        self.trap_stack = Some(kstack_top);
    }

    fn user_entry(&self) -> usize {
        USER_ENTRY
    }

    unsafe fn switch_context(&mut self, prev_sp: *mut usize, next_sp: *const usize) {
        unsafe {
            let sp = self.sp - SwitchFrame::SIZE;
            let pushed = sp as *mut usize;
            for (i, word) in self.regs.words().into_iter().enumerate() {
                pushed.add(i).write(word);
            }
            *prev_sp = sp;

            let sp = *next_sp;
            let popped = sp as *const usize;
            let mut words = [0usize; SwitchFrame::WORDS];
            for (i, word) in words.iter_mut().enumerate() {
                *word = popped.add(i).read();
            }
            self.regs = SwitchFrame::from_words(&words);
            self.sp = sp + SwitchFrame::SIZE;
        }
        self.switches += 1;
    }
}

/// Console with queued input that only becomes visible after a number of
/// empty polls.
#[derive(Default)]
pub struct ScriptedConsole {
    pub input: VecDeque<u8>,
    pub empty_polls: usize,
    pub polls: usize,
    pub output: Vec<u8>,
}

impl ScriptedConsole {
    pub fn ready_after(polls: usize, input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            empty_polls: polls,
            ..Self::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn put(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn get(&mut self) -> Option<u8> {
        self.polls += 1;
        if self.empty_polls > 0 {
            self.empty_polls -= 1;
            return None;
        }
        self.input.pop_front()
    }
}

pub fn process_table() -> Box<ProcessTable> {
    Box::new(ProcessTable::new())
}

pub fn disk_with(files: &[(&str, &[u8])]) -> MemDisk {
    let mut store = FileStore::new();
    for (name, data) in files {
        store.insert(name.as_bytes(), data).unwrap();
    }
    let mut image = vec![0u8; DISK_MAX_SIZE];
    store.encode_image(&mut image).unwrap();
    // A little spare room past the store, like a real disk.
    image.resize(DISK_MAX_SIZE + 4 * 512, 0);
    MemDisk::from_image(image)
}

pub fn new_kernel(procs: &mut ProcessTable, disk: MemDisk) -> TestKernel<'_> {
    let mmu = Mmu::new(SimRam::new(LAYOUT), PageAllocator::from_layout(&LAYOUT));
    Kernel::new(procs, SimHart::new(), mmu, ScriptedConsole::default(), disk, LAYOUT)
}

/// Idle plus one user process, switched to the user process.
pub fn boot_shell(kernel: &mut TestKernel<'_>) -> Pid {
    kernel.mount_fs();
    kernel.spawn_idle();
    let pid = kernel.create_process(&[0u8; USER_IMAGE_PAGES * SV32_PAGE_SIZE]);
    kernel.yield_now();
    assert_eq!(kernel.procs().current().pid(), pid);
    pid
}

/// Place bytes in the current process's memory at `USER_BASE + offset`.
pub fn poke_user(kernel: &mut TestKernel<'_>, offset: u32, data: &[u8]) -> u32 {
    let root = kernel.procs().current().page_table();
    let vaddr = USER_BASE + offset;
    assert!(kernel.mmu_mut().copy_to_user(root, vaddr, data));
    vaddr
}

pub fn peek_user(kernel: &TestKernel<'_>, vaddr: u32, len: usize) -> Vec<u8> {
    let root = kernel.procs().current().page_table();
    let mut out = vec![0u8; len];
    assert!(kernel.mmu().copy_from_user(root, vaddr, &mut out));
    out
}

pub const ECALL_PC: u32 = USER_BASE + 0x40;

pub fn ecall_info() -> TrapInfo {
    TrapInfo {
        scause: SCAUSE_ECALL,
        stval: 0,
        sepc: ECALL_PC,
    }
}

pub fn syscall_frame(id: u32, args: [u32; 3]) -> TrapFrame {
    let mut words = [0u32; TrapFrame::WORDS];
    for (i, w) in words.iter_mut().enumerate() {
        *w = 0x1000 + i as u32;
    }
    let mut frame = TrapFrame::from_words(&words);
    frame.a0 = args[0];
    frame.a1 = args[1];
    frame.a2 = args[2];
    frame.a3 = id;
    frame
}

thread_local! {
    static LOGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn capture(args: std::fmt::Arguments<'_>) {
    LOGS.with(|logs| logs.borrow_mut().push(args.to_string()));
}

/// Route kernel logs to a per-thread buffer.
pub fn capture_logs() {
    kernel::log::set_sink(capture);
    LOGS.with(|logs| logs.borrow_mut().clear());
}

pub fn logs() -> Vec<String> {
    LOGS.with(|logs| logs.borrow().clone())
}

pub fn logged(needle: &str) -> bool {
    logs().iter().any(|line| line.contains(needle))
}
