use anyhow::{bail, Result};
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::Elf;

pub struct ElfInfo<'a> {
    pub entry: u64,
    pub segments: Vec<LoadSegment<'a>>,
}

/// One `PT_LOAD` segment. `data` is the file-backed prefix; the rest of
/// `mem_size` is zero-filled by whoever loads it.
pub struct LoadSegment<'a> {
    pub vaddr: u64,
    pub mem_size: u64,
    pub data: &'a [u8],
}

impl<'a> ElfInfo<'a> {
    /// Returns every loadable segment laid out in one buffer, and the base address.
    ///
    /// Gaps between segments and `.bss` tails are zero.
    pub fn get_flat_image(&self) -> Option<(Vec<u8>, u64)> {
        let min_addr = self.segments.iter().map(|s| s.vaddr).min()?;
        let max_addr = self.segments.iter().map(|s| s.vaddr + s.mem_size).max()?;

        let total_size = (max_addr - min_addr) as usize;
        let mut flat = vec![0u8; total_size];

        for segment in &self.segments {
            let offset = (segment.vaddr - min_addr) as usize;
            flat[offset..offset + segment.data.len()].copy_from_slice(segment.data);
        }

        Some((flat, min_addr))
    }
}

pub fn parse_elf_from_bytes(bytes: &[u8]) -> Result<ElfInfo<'_>> {
    let elf = Elf::parse(bytes)?;

    let mut segments = Vec::new();
    for ph in elf.program_headers.iter().filter(|ph| ph.p_type == PT_LOAD) {
        if ph.p_memsz == 0 {
            continue;
        }
        if ph.p_filesz > ph.p_memsz {
            bail!("segment at {:#x} has filesz {:#x} > memsz {:#x}", ph.p_vaddr, ph.p_filesz, ph.p_memsz);
        }
        let offset = ph.p_offset as usize;
        let size = ph.p_filesz as usize;
        let Some(data) = bytes.get(offset..offset + size) else {
            bail!("segment at {:#x} runs past the end of the file", ph.p_vaddr);
        };
        segments.push(LoadSegment {
            vaddr: ph.p_vaddr,
            mem_size: ph.p_memsz,
            data,
        });
    }

    Ok(ElfInfo { entry: elf.entry, segments })
}
