#![no_std]
#![no_main]

use core::fmt::{self, Write};
use core::mem::size_of;
use core::panic::PanicInfo;
use core::ptr::NonNull;

use kernel::arch::riscv32::{self, IdentityMemory, MmioRegion, Riscv32Hart, SbiConsole, csr};
use kernel::virtio::{BlkRequest, VirtQueue};
use kernel::{Config, Global, Kernel, Mmu, PageAllocator, ProcessTable, TrapFrame, VirtioBlk, log, logf};
use types::{MemoryLayout, SV32_PAGE_SIZE};

type BootKernel = Kernel<'static, Riscv32Hart, IdentityMemory, SbiConsole, VirtioBlk<MmioRegion>>;

static PROCS: Global<ProcessTable> = Global::new(ProcessTable::new());
static KERNEL: Global<Option<BootKernel>> = Global::new(None);

/// Flat image of the user shell, linked at `USER_BASE`.
static SHELL_IMAGE: &[u8] = include_bytes!(env!("SHELL_BIN"));

unsafe extern "C" {
    static __kernel_base: u8;
    static mut __bss: u8;
    static __bss_end: u8;
    static __free_ram: u8;
    static __free_ram_end: u8;
}

core::arch::global_asm!(
    ".section .text.boot",
    ".globl boot",
    "boot:",
    "    la sp, __stack_top",
    "    j kernel_main",
);

#[unsafe(no_mangle)]
extern "C" fn kernel_main() -> ! {
    zero_bss();
    kernel::log::set_sink(console_sink);
    csr::write_stvec(riscv32::kernel_entry as usize);
    log!("booting");

    let layout = unsafe {
        MemoryLayout::new(
            &raw const __kernel_base as u32,
            &raw const __free_ram as u32,
            &raw const __free_ram_end as u32,
        )
    };
    logf!(
        "free ram {:#x}..{:#x}, kernel at {:#x}",
        layout.free_ram, layout.free_ram_end, layout.kernel_base
    );

    let mut mmu = Mmu::new(IdentityMemory, PageAllocator::from_layout(&layout));
    let queue = dma_pages::<VirtQueue>(&mut mmu);
    let req = dma_pages::<BlkRequest>(&mut mmu);
    // The register window is identity mapped in every address space and the
    // queue pages are fresh, zeroed RAM owned by the driver from here on.
    let disk = unsafe {
        VirtioBlk::init(MmioRegion::new(Config::VIRTIO_BLK_PADDR as usize), queue, req)
    };

    let procs = unsafe { PROCS.get_mut() };
    let slot = unsafe { KERNEL.get_mut() };
    let kernel = slot.insert(Kernel::new(procs, Riscv32Hart, mmu, SbiConsole, disk, layout));

    kernel.mount_fs();
    kernel.spawn_idle();
    kernel.create_process(SHELL_IMAGE);
    kernel.yield_now();

    // Back on idle: every user process has exited.
    log!("no runnable processes; halting");
    riscv32::halt()
}

/// Called by `kernel_entry` with the frame it just saved.
#[unsafe(no_mangle)]
extern "C" fn kernel_trap(frame: *mut TrapFrame) {
    let info = riscv32::trap_info();
    let Some(kernel) = unsafe { KERNEL.get_mut() }.as_mut() else {
        panic!("trap before kernel init: {:?}", info);
    };
    let frame = unsafe { &mut *frame };
    let resume_pc = kernel.handle_trap(frame, info);
    csr::write_sepc(resume_pc);
}

fn dma_pages<T>(mmu: &mut Mmu<IdentityMemory>) -> NonNull<T> {
    let paddr = mmu.alloc_pages(size_of::<T>().div_ceil(SV32_PAGE_SIZE));
    match NonNull::new(paddr as usize as *mut T) {
        Some(ptr) => ptr,
        None => panic!("dma allocation at address 0"),
    }
}

fn zero_bss() {
    unsafe {
        let start = &raw mut __bss;
        let len = &raw const __bss_end as usize - start as usize;
        core::ptr::write_bytes(start, 0, len);
    }
}

fn console_sink(args: fmt::Arguments<'_>) {
    let _ = SbiConsole.write_fmt(args);
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let mut out = SbiConsole;
    let _ = match info.location() {
        Some(loc) => writeln!(out, "PANIC: {}:{}: {}", loc.file(), loc.line(), info.message()),
        None => writeln!(out, "PANIC: {}", info.message()),
    };
    riscv32::halt()
}
