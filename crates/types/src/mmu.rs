use crate::MapError;

/// Sv32 page size in bytes (4 KiB).
pub const SV32_PAGE_SIZE: usize = 4096;
/// Number of bits in a VPN index.
pub const SV32_VPN_MASK: u32 = 0x3ff;

/// Sv32 PTE flag bits.
pub const SV32_PTE_V: u32 = 1 << 0;
pub const SV32_PTE_R: u32 = 1 << 1;
pub const SV32_PTE_W: u32 = 1 << 2;
pub const SV32_PTE_X: u32 = 1 << 3;
pub const SV32_PTE_U: u32 = 1 << 4;

/// satp MODE bit selecting Sv32 translation.
pub const SATP_SV32: u32 = 1 << 31;

/// Simple permission descriptor for Sv32 mappings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sv32PagePerms {
    pub read: bool,
    pub write: bool,
    pub exec: bool,
    pub user: bool,
}

impl Sv32PagePerms {
    pub const fn new(read: bool, write: bool, exec: bool, user: bool) -> Self {
        Self {
            read,
            write,
            exec,
            user,
        }
    }

    pub const fn user_rwx() -> Self {
        Self::new(true, true, true, true)
    }

    pub const fn kernel_rw() -> Self {
        Self::new(true, true, false, false)
    }

    pub const fn kernel_rwx() -> Self {
        Self::new(true, true, true, false)
    }

    pub const fn to_pte_flags(self) -> u32 {
        let mut flags = SV32_PTE_V;
        if self.read {
            flags |= SV32_PTE_R;
        }
        if self.write {
            flags |= SV32_PTE_W;
        }
        if self.exec {
            flags |= SV32_PTE_X;
        }
        if self.user {
            flags |= SV32_PTE_U;
        }
        flags
    }
}

/// Abstraction for Sv32 page-table manipulation.
///
/// Implementations provide raw PTE reads/writes at physical addresses and
/// hand out zeroed frames for intermediate tables. The walk itself lives in
/// the free functions below so the kernel and host tests share it.
pub trait Sv32PageTable {
    fn read_pte(&self, pte_addr: u32) -> u32;
    fn write_pte(&mut self, pte_addr: u32, val: u32);
    /// Allocate one zeroed frame and return its physical address.
    fn alloc_table(&mut self) -> Result<u32, MapError>;
}

/// Value to load into `satp` to translate through `root`.
pub const fn satp_for_root(root: u32) -> u32 {
    SATP_SV32 | (root / SV32_PAGE_SIZE as u32)
}

/// Install a 4 KiB leaf mapping `vaddr -> paddr` under `root`.
///
/// The level-0 table is allocated on first use. An existing leaf for
/// `vaddr` is overwritten.
pub fn map_page<T: Sv32PageTable + ?Sized>(
    pt: &mut T,
    root: u32,
    vaddr: u32,
    paddr: u32,
    perms: Sv32PagePerms,
) -> Result<(), MapError> {
    if !is_page_aligned(vaddr) {
        return Err(MapError::UnalignedVaddr(vaddr));
    }
    if !is_page_aligned(paddr) {
        return Err(MapError::UnalignedPaddr(paddr));
    }

    let vpn1 = (vaddr >> 22) & SV32_VPN_MASK;
    let l1_addr = root + vpn1 * 4;
    let mut l1_pte = pt.read_pte(l1_addr);
    if l1_pte & SV32_PTE_V == 0 {
        let table = pt.alloc_table()?;
        l1_pte = ((table / SV32_PAGE_SIZE as u32) << 10) | SV32_PTE_V;
        pt.write_pte(l1_addr, l1_pte);
    } else if l1_pte & (SV32_PTE_R | SV32_PTE_W | SV32_PTE_X) != 0 {
        // Superpages are not supported.
        return Err(MapError::Superpage(vaddr));
    }

    let vpn0 = (vaddr >> 12) & SV32_VPN_MASK;
    let l0_addr = ((l1_pte >> 10) << 12) + vpn0 * 4;
    let leaf = ((paddr / SV32_PAGE_SIZE as u32) << 10) | perms.to_pte_flags();
    pt.write_pte(l0_addr, leaf);
    Ok(())
}

/// Map `[vaddr, vaddr + len)` onto the physical range starting at `paddr`.
pub fn map_range<T: Sv32PageTable + ?Sized>(
    pt: &mut T,
    root: u32,
    vaddr: u32,
    paddr: u32,
    len: u32,
    perms: Sv32PagePerms,
) -> Result<(), MapError> {
    let page = SV32_PAGE_SIZE as u32;
    let mut off = 0u32;
    while off < len {
        map_page(pt, root, vaddr.wrapping_add(off), paddr.wrapping_add(off), perms)?;
        off = match off.checked_add(page) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(())
}

/// Walk Sv32 under `root` and translate `vaddr` to a physical address.
///
/// Returns `None` for unmapped pages and for 4 MiB superpages, which this
/// kernel never creates.
pub fn translate<T: Sv32PageTable + ?Sized>(pt: &T, root: u32, vaddr: u32) -> Option<u32> {
    let vpn1 = (vaddr >> 22) & SV32_VPN_MASK;
    let l1_pte = pt.read_pte(root + vpn1 * 4);
    if l1_pte & SV32_PTE_V == 0 || l1_pte & (SV32_PTE_R | SV32_PTE_W | SV32_PTE_X) != 0 {
        return None;
    }

    let vpn0 = (vaddr >> 12) & SV32_VPN_MASK;
    let leaf = pt.read_pte(((l1_pte >> 10) << 12) + vpn0 * 4);
    if leaf & SV32_PTE_V == 0 {
        return None;
    }
    Some(((leaf >> 10) << 12) | (vaddr & 0xfff))
}

/// Leaf permissions of `vaddr`, if it is mapped.
pub fn leaf_flags<T: Sv32PageTable + ?Sized>(pt: &T, root: u32, vaddr: u32) -> Option<u32> {
    let vpn1 = (vaddr >> 22) & SV32_VPN_MASK;
    let l1_pte = pt.read_pte(root + vpn1 * 4);
    if l1_pte & SV32_PTE_V == 0 || l1_pte & (SV32_PTE_R | SV32_PTE_W | SV32_PTE_X) != 0 {
        return None;
    }
    let vpn0 = (vaddr >> 12) & SV32_VPN_MASK;
    let leaf = pt.read_pte(((l1_pte >> 10) << 12) + vpn0 * 4);
    if leaf & SV32_PTE_V == 0 {
        None
    } else {
        Some(leaf & 0x3ff)
    }
}

pub const fn is_page_aligned(addr: u32) -> bool {
    addr as usize % SV32_PAGE_SIZE == 0
}

pub const fn align_up(val: usize, align: usize) -> usize {
    (val + (align - 1)) & !(align - 1)
}
