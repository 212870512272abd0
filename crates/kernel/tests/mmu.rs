mod common;

use common::*;
use kernel::{Mmu, PageAllocator, PhysMemory};
use types::{
    SV32_PAGE_SIZE, SV32_PTE_R, SV32_PTE_U, SV32_PTE_V, SV32_PTE_W, SV32_PTE_X, Sv32PagePerms, USER_BASE,
    VIRTIO_BLK_PADDR, leaf_flags,
};

const PAGE: u32 = SV32_PAGE_SIZE as u32;

fn mmu() -> Mmu<SimRam> {
    Mmu::new(SimRam::new(LAYOUT), PageAllocator::from_layout(&LAYOUT))
}

#[test]
fn test_alloc_pages_is_monotonic_and_zeroed() {
    let mut mmu = mmu();
    let a = mmu.alloc_pages(1);
    assert_eq!(a, LAYOUT.free_ram);
    mmu.memory_mut().write_u32(a + PAGE + 8, 0xffff_ffff);

    let b = mmu.alloc_pages(2);
    assert_eq!(b, a + PAGE);
    assert_eq!(mmu.memory().read_u32(b + 8), 0);
    assert_eq!(mmu.alloc_pages(1), b + 2 * PAGE);
    assert_eq!(mmu.allocator().next_free(), b + 3 * PAGE);
}

#[test]
#[should_panic(expected = "out of memory")]
fn test_exhaustion_is_fatal() {
    let mut mmu = mmu();
    let pages = mmu.allocator().remaining_pages();
    mmu.alloc_pages(pages);
    mmu.alloc_pages(1);
}

#[test]
#[should_panic(expected = "map_page: unaligned vaddr 0x1000010")]
fn test_unaligned_mapping_is_fatal() {
    let mut mmu = mmu();
    let root = mmu.alloc_pages(1);
    let page = mmu.alloc_pages(1);
    mmu.map_page(root, USER_BASE + 0x10, page, Sv32PagePerms::user_rwx());
}

#[test]
fn test_user_copies_follow_the_page_table() {
    let mut mmu = mmu();
    let root = mmu.alloc_pages(1);
    let lo = mmu.alloc_pages(1);
    let _gap = mmu.alloc_pages(1);
    let hi = mmu.alloc_pages(1);
    // Two virtually adjacent pages backed by non-adjacent frames.
    mmu.map_page(root, USER_BASE, lo, Sv32PagePerms::user_rwx());
    mmu.map_page(root, USER_BASE + PAGE, hi, Sv32PagePerms::user_rwx());

    assert!(mmu.copy_to_user(root, USER_BASE + PAGE - 2, b"abcd"));
    let mut tail = [0u8; 2];
    mmu.memory().read_bytes(lo + PAGE - 2, &mut tail);
    assert_eq!(&tail, b"ab");
    mmu.memory().read_bytes(hi, &mut tail);
    assert_eq!(&tail, b"cd");

    let mut out = [0u8; 4];
    assert!(mmu.copy_from_user(root, USER_BASE + PAGE - 2, &mut out));
    assert_eq!(&out, b"abcd");

    assert!(!mmu.copy_to_user(root, USER_BASE + 2 * PAGE - 1, b"xy"));
    assert_eq!(mmu.translate(root, USER_BASE + 2 * PAGE), None);
}

#[test]
fn test_read_user_cstr() {
    let mut mmu = mmu();
    let root = mmu.alloc_pages(1);
    let page = mmu.alloc_pages(1);
    mmu.map_page(root, USER_BASE, page, Sv32PagePerms::user_rwx());
    mmu.copy_to_user(root, USER_BASE, b"hello.txt\0junk");

    let mut buf = [0u8; 100];
    assert_eq!(mmu.read_user_cstr(root, USER_BASE, &mut buf), Some(&b"hello.txt"[..]));
    // Runs off the end of the mapping before a terminator.
    mmu.copy_to_user(root, USER_BASE + PAGE - 3, b"abc");
    assert_eq!(mmu.read_user_cstr(root, USER_BASE + PAGE - 3, &mut buf), None);
}

#[test]
fn test_process_address_space() {
    let mut procs = process_table();
    let mut kernel = new_kernel(&mut procs, disk_with(&[]));
    kernel.spawn_idle();
    let mut image = vec![0u8; SV32_PAGE_SIZE + 100];
    image[..4].copy_from_slice(b"\x13\x00\x00\x00");
    image[SV32_PAGE_SIZE..SV32_PAGE_SIZE + 4].copy_from_slice(b"page");
    let pid = kernel.create_process(&image);
    let root = kernel.procs().find(pid).unwrap().page_table();
    let mmu = kernel.mmu();

    let user = SV32_PTE_V | SV32_PTE_R | SV32_PTE_W | SV32_PTE_X | SV32_PTE_U;
    assert_eq!(leaf_flags(mmu, root, USER_BASE), Some(user));
    assert_eq!(leaf_flags(mmu, root, USER_BASE + PAGE), Some(user));
    assert_eq!(leaf_flags(mmu, root, USER_BASE + 2 * PAGE), None);

    let mut word = [0u8; 4];
    assert!(mmu.copy_from_user(root, USER_BASE + PAGE, &mut word));
    assert_eq!(&word, b"page");

    let kernel_rwx = SV32_PTE_V | SV32_PTE_R | SV32_PTE_W | SV32_PTE_X;
    assert_eq!(leaf_flags(mmu, root, LAYOUT.kernel_base), Some(kernel_rwx));
    assert_eq!(mmu.translate(root, LAYOUT.free_ram_end - 4), Some(LAYOUT.free_ram_end - 4));
    assert_eq!(leaf_flags(mmu, root, LAYOUT.free_ram_end), None);
    assert_eq!(
        leaf_flags(mmu, root, VIRTIO_BLK_PADDR),
        Some(SV32_PTE_V | SV32_PTE_R | SV32_PTE_W)
    );
}
