//! Just enough ustar to round-trip flat files.
//!
//! Every entry is a 512-byte header followed by the file data, padded to the
//! next 512-byte boundary. An all-zero header (empty name) ends the archive.

use core::ops::Range;

use types::align_up;

use crate::FsError;

pub const TAR_HEADER_SIZE: usize = 512;

const NAME: Range<usize> = 0..100;
const MODE: Range<usize> = 100..108;
const SIZE: Range<usize> = 124..136;
const CHECKSUM: Range<usize> = 148..156;
const TYPEFLAG: usize = 156;
const MAGIC: Range<usize> = 257..263;
const VERSION: Range<usize> = 263..265;

const USTAR_MAGIC: &[u8] = b"ustar";
const DEFAULT_MODE: &[u8] = b"000644";
const REGULAR_FILE: u8 = b'0';

/// One archive member borrowed from an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub name: &'a [u8],
    pub data: &'a [u8],
}

/// Bytes an entry with `size` bytes of data occupies in the archive.
pub const fn entry_len(size: usize) -> usize {
    align_up(TAR_HEADER_SIZE + size, TAR_HEADER_SIZE)
}

/// Parse the header at `offset`.
///
/// Returns `Ok(None)` at the end of the archive, otherwise the entry and the
/// offset of the next header.
pub fn read_entry(image: &[u8], offset: usize) -> Result<Option<(Entry<'_>, usize)>, FsError> {
    let header = match image.get(offset..offset + TAR_HEADER_SIZE) {
        Some(header) => header,
        None => return Ok(None),
    };
    if header[NAME.start] == 0 {
        return Ok(None);
    }
    if !header[MAGIC].starts_with(USTAR_MAGIC) {
        return Err(FsError::BadMagic { offset });
    }
    if parse_octal(&header[CHECKSUM]) != checksum(header) {
        return Err(FsError::BadChecksum { offset });
    }

    let size = parse_octal(&header[SIZE]) as usize;
    let data_start = offset + TAR_HEADER_SIZE;
    let data = image
        .get(data_start..data_start + size)
        .ok_or(FsError::Truncated { offset })?;

    let name = &header[NAME];
    let name_len = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    let entry = Entry {
        name: &name[..name_len],
        data,
    };
    Ok(Some((entry, offset + entry_len(size))))
}

/// Serialize one regular file at `offset`, returning the next header offset.
///
/// The target region must already be zeroed.
pub fn write_entry(image: &mut [u8], offset: usize, name: &[u8], data: &[u8]) -> Result<usize, FsError> {
    if name.len() >= NAME.end {
        return Err(FsError::NameTooLong(name.len()));
    }
    let end = offset + entry_len(data.len());
    if end > image.len() {
        return Err(FsError::Truncated { offset });
    }

    let header = &mut image[offset..offset + TAR_HEADER_SIZE];
    header[..name.len()].copy_from_slice(name);
    header[MODE][..DEFAULT_MODE.len()].copy_from_slice(DEFAULT_MODE);
    header[MAGIC][..USTAR_MAGIC.len()].copy_from_slice(USTAR_MAGIC);
    header[VERSION].copy_from_slice(b"00");
    header[TYPEFLAG] = REGULAR_FILE;
    write_octal(&mut header[SIZE], data.len() as u32);

    let sum = checksum(header);
    let field = &mut header[CHECKSUM];
    write_octal(&mut field[..7], sum);
    field[7] = b' ';

    let data_start = offset + TAR_HEADER_SIZE;
    image[data_start..data_start + data.len()].copy_from_slice(data);
    Ok(end)
}

/// Header checksum with the checksum field itself counted as spaces.
fn checksum(header: &[u8]) -> u32 {
    header
        .iter()
        .enumerate()
        .map(|(i, &b)| if CHECKSUM.contains(&i) { b' ' as u32 } else { b as u32 })
        .sum()
}

fn parse_octal(field: &[u8]) -> u32 {
    field
        .iter()
        .skip_while(|&&b| b == b' ')
        .take_while(|&&b| (b'0'..=b'7').contains(&b))
        .fold(0u32, |acc, &b| acc.wrapping_mul(8).wrapping_add((b - b'0') as u32))
}

/// Zero-padded octal digits followed by a NUL terminator.
fn write_octal(field: &mut [u8], mut value: u32) {
    let digits = field.len() - 1;
    for slot in field[..digits].iter_mut().rev() {
        *slot = b'0' + (value % 8) as u8;
        value /= 8;
    }
    field[digits] = 0;
}
