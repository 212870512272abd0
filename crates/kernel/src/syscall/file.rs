use storage::{BlockDevice, FILE_DATA_MAX, FILE_NAME_MAX};
use types::SYSCALL_ERROR;

use crate::log::Bytes;
use crate::{Console, Hart, Kernel, PhysMemory, logf};

/// Length actually transferred for a request of `len` bytes against a file
/// holding `size` bytes.
///
/// Requests larger than a file's capacity fall back to its stored size.
/// Reads never go past the stored size; writes within capacity take the
/// requested length as the new size.
fn clamp_len(len: u32, size: usize, is_write: bool) -> usize {
    let len = len as usize;
    if len > FILE_DATA_MAX {
        size
    } else if is_write {
        len
    } else {
        len.min(size)
    }
}

impl<H, M, C, D> Kernel<'_, H, M, C, D>
where
    H: Hart,
    M: PhysMemory,
    C: Console,
    D: BlockDevice,
{
    pub(super) fn sys_readfile(&mut self, name_ptr: u32, buf_ptr: u32, len: u32) -> u32 {
        let root = self.procs.current().page_table();
        let mut name_buf = [0u8; FILE_NAME_MAX];
        let Some(name) = self.mmu.read_user_cstr(root, name_ptr, &mut name_buf) else {
            logf!("readfile: bad filename pointer {:#x}", name_ptr);
            return SYSCALL_ERROR;
        };
        let Some(file) = self.fs.lookup(name) else {
            logf!("file not found: {}", Bytes(name));
            return SYSCALL_ERROR;
        };

        let count = clamp_len(len, file.size(), false);
        if !self.mmu.copy_to_user(root, buf_ptr, &file.contents()[..count]) {
            logf!("readfile: bad buffer {:#x}+{}", buf_ptr, count);
            return SYSCALL_ERROR;
        }
        count as u32
    }

    /// Replace a file's contents and persist the whole store.
    pub(super) fn sys_writefile(&mut self, name_ptr: u32, buf_ptr: u32, len: u32) -> u32 {
        let root = self.procs.current().page_table();
        let mut name_buf = [0u8; FILE_NAME_MAX];
        let Some(name) = self.mmu.read_user_cstr(root, name_ptr, &mut name_buf) else {
            logf!("writefile: bad filename pointer {:#x}", name_ptr);
            return SYSCALL_ERROR;
        };
        let Some(file) = self.fs.lookup(name) else {
            logf!("file not found: {}", Bytes(name));
            return SYSCALL_ERROR;
        };

        let count = clamp_len(len, file.size(), true);
        let mut data = [0u8; FILE_DATA_MAX];
        if !self.mmu.copy_from_user(root, buf_ptr, &mut data[..count]) {
            logf!("writefile: bad buffer {:#x}+{}", buf_ptr, count);
            return SYSCALL_ERROR;
        }
        if let Err(err) = file.overwrite(&data[..count]) {
            logf!("writefile: {}", err);
            return SYSCALL_ERROR;
        }

        let written = self.fs.flush(&mut self.disk);
        logf!("wrote {} bytes to disk", written);
        count as u32
    }
}
