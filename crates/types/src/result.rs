use core::fmt;

/// Failure modes of an Sv32 mapping request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    UnalignedVaddr(u32),
    UnalignedPaddr(u32),
    /// The level-1 entry covering this address is already a 4 MiB leaf.
    Superpage(u32),
    /// No frame was left for an intermediate table.
    OutOfFrames,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnalignedVaddr(va) => write!(f, "unaligned vaddr {:#x}", va),
            MapError::UnalignedPaddr(pa) => write!(f, "unaligned paddr {:#x}", pa),
            MapError::Superpage(va) => write!(f, "superpage already covers {:#x}", va),
            MapError::OutOfFrames => f.write_str("out of page-table frames"),
        }
    }
}
