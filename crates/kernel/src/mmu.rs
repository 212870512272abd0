use core::cmp;

use types::{
    MapError, MemoryLayout, SV32_PAGE_SIZE, Sv32PagePerms, Sv32PageTable, map_page, map_range, translate,
};

use crate::logf;

const PAGE_SIZE: usize = SV32_PAGE_SIZE;

/// Permissions used by the kernel/user mapping helpers.
pub type PagePerms = Sv32PagePerms;

/// Physical memory as seen by the kernel.
///
/// On the target RAM is identity mapped in every address space, so physical
/// addresses are dereferenced directly. Tests back this with a byte vector.
pub trait PhysMemory {
    fn read_u32(&self, paddr: u32) -> u32;
    fn write_u32(&mut self, paddr: u32, val: u32);
    fn read_bytes(&self, paddr: u32, out: &mut [u8]);
    fn write_bytes(&mut self, paddr: u32, data: &[u8]);
    fn fill_zero(&mut self, paddr: u32, len: usize);
}

/// Bump allocator over free RAM. Pages are never returned.
#[derive(Debug, Clone, Copy)]
pub struct PageAllocator {
    next: u32,
    end: u32,
}

impl PageAllocator {
    /// Allocator over `[start, end)`; both bounds must be page aligned.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { next: start, end }
    }

    pub fn from_layout(layout: &MemoryLayout) -> Self {
        Self::new(layout.free_ram, layout.free_ram_end)
    }

    /// Reserve `count` contiguous pages, or `None` when RAM is exhausted.
    pub fn alloc(&mut self, count: usize) -> Option<u32> {
        let bytes = u32::try_from(count.checked_mul(PAGE_SIZE)?).ok()?;
        let end = self.next.checked_add(bytes)?;
        if end > self.end {
            return None;
        }
        let paddr = self.next;
        self.next = end;
        Some(paddr)
    }

    /// First address that has not been handed out yet.
    pub fn next_free(&self) -> u32 {
        self.next
    }

    pub fn remaining_pages(&self) -> usize {
        (self.end - self.next) as usize / PAGE_SIZE
    }
}

/// Page allocator plus the memory it hands out, walked as Sv32 tables.
pub struct Mmu<M> {
    mem: M,
    alloc: PageAllocator,
}

impl<M: PhysMemory> Mmu<M> {
    pub fn new(mem: M, alloc: PageAllocator) -> Self {
        Self { mem, alloc }
    }

    pub fn memory(&self) -> &M {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.mem
    }

    pub fn allocator(&self) -> &PageAllocator {
        &self.alloc
    }

    /// Allocate `count` zeroed, contiguous pages. Exhaustion is fatal.
    pub fn alloc_pages(&mut self, count: usize) -> u32 {
        let Some(paddr) = self.alloc.alloc(count) else {
            panic!("out of memory");
        };
        self.mem.fill_zero(paddr, count * PAGE_SIZE);
        paddr
    }

    /// Install one 4 KiB mapping under `root`. Misaligned addresses are fatal.
    pub fn map_page(&mut self, root: u32, vaddr: u32, paddr: u32, perms: PagePerms) {
        if let Err(err) = map_page(self, root, vaddr, paddr, perms) {
            panic!("map_page: {}", err);
        }
    }

    /// Map `len` bytes starting at `vaddr` onto the same physical addresses.
    pub fn identity_map(&mut self, root: u32, start: u32, len: u32, perms: PagePerms) {
        if let Err(err) = map_range(self, root, start, start, len, perms) {
            panic!("identity_map {:#x}+{:#x}: {}", start, len, err);
        }
    }

    /// Copy `image` into freshly allocated pages mapped at `vaddr`.
    pub fn load_image(&mut self, root: u32, vaddr: u32, image: &[u8], perms: PagePerms) {
        for (index, chunk) in image.chunks(PAGE_SIZE).enumerate() {
            let page = self.alloc_pages(1);
            self.mem.write_bytes(page, chunk);
            self.map_page(root, vaddr + (index * PAGE_SIZE) as u32, page, perms);
        }
    }

    /// Walk Sv32 under `root` and translate a user VA to a physical address.
    pub fn translate(&self, root: u32, vaddr: u32) -> Option<u32> {
        translate(self, root, vaddr)
    }

    /// Copy data into a user VA range, page by page.
    ///
    /// Returns false if any page of the range is unmapped; earlier pages may
    /// already have been written.
    pub fn copy_to_user(&mut self, root: u32, vaddr: u32, data: &[u8]) -> bool {
        let mut copied = 0usize;
        while copied < data.len() {
            let va = vaddr.wrapping_add(copied as u32);
            let Some(phys) = self.translate(root, va) else {
                return false;
            };
            let to_copy = cmp::min(data.len() - copied, page_remaining(va));
            self.mem.write_bytes(phys, &data[copied..copied + to_copy]);
            copied += to_copy;
        }
        true
    }

    /// Fill `out` from a user VA range. Returns false if any page is unmapped.
    pub fn copy_from_user(&self, root: u32, vaddr: u32, out: &mut [u8]) -> bool {
        let mut copied = 0usize;
        while copied < out.len() {
            let va = vaddr.wrapping_add(copied as u32);
            let Some(phys) = self.translate(root, va) else {
                return false;
            };
            let to_copy = cmp::min(out.len() - copied, page_remaining(va));
            self.mem.read_bytes(phys, &mut out[copied..copied + to_copy]);
            copied += to_copy;
        }
        true
    }

    /// Read a NUL-terminated string from user memory into `buf`.
    ///
    /// Returns the bytes before the terminator, or `None` if the string runs
    /// into an unmapped page or does not terminate within `buf`.
    pub fn read_user_cstr<'b>(&self, root: u32, vaddr: u32, buf: &'b mut [u8]) -> Option<&'b [u8]> {
        let mut byte = [0u8; 1];
        for i in 0..buf.len() {
            if !self.copy_from_user(root, vaddr.wrapping_add(i as u32), &mut byte) {
                return None;
            }
            if byte[0] == 0 {
                return Some(&buf[..i]);
            }
            buf[i] = byte[0];
        }
        logf!("user string at {:#x} is not terminated", vaddr);
        None
    }
}

impl<M: PhysMemory> Sv32PageTable for Mmu<M> {
    fn read_pte(&self, pte_addr: u32) -> u32 {
        self.mem.read_u32(pte_addr)
    }

    fn write_pte(&mut self, pte_addr: u32, val: u32) {
        self.mem.write_u32(pte_addr, val);
    }

    fn alloc_table(&mut self) -> Result<u32, MapError> {
        let paddr = self.alloc.alloc(1).ok_or(MapError::OutOfFrames)?;
        self.mem.fill_zero(paddr, PAGE_SIZE);
        Ok(paddr)
    }
}

fn page_remaining(vaddr: u32) -> usize {
    PAGE_SIZE - (vaddr as usize & (PAGE_SIZE - 1))
}

