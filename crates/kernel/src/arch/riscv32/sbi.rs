//! Legacy SBI console extension.

use core::arch::asm;

const EID_CONSOLE_PUTCHAR: usize = 1;
const EID_CONSOLE_GETCHAR: usize = 2;

pub struct SbiRet {
    pub error: isize,
    pub value: isize,
}

#[inline(always)]
fn sbi_call(arg0: usize, fid: usize, eid: usize) -> SbiRet {
    let error: usize;
    let value: usize;
    unsafe {
        asm!(
            "ecall",
            inlateout("a0") arg0 => error,
            lateout("a1") value,
            in("a6") fid,
            in("a7") eid,
        );
    }
    SbiRet {
        error: error as isize,
        value: value as isize,
    }
}

pub fn console_putchar(ch: u8) {
    sbi_call(ch as usize, 0, EID_CONSOLE_PUTCHAR);
}

/// The legacy call returns the character in a0, or a negative value when
/// nothing is pending.
pub fn console_getchar() -> Option<u8> {
    let ret = sbi_call(0, 0, EID_CONSOLE_GETCHAR);
    if ret.error < 0 { None } else { Some(ret.error as u8) }
}
