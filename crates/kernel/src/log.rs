//! Kernel logging.
//!
//! `log!` takes a literal, `logf!` a format string with arguments. Both render
//! through `core::fmt` into the sink installed with [`set_sink`]; until a sink
//! is installed messages are dropped.

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Destination for rendered log lines.
pub type Sink = fn(fmt::Arguments<'_>);

static SINK: AtomicPtr<()> = AtomicPtr::new(core::ptr::null_mut());

pub fn set_sink(sink: Sink) {
    SINK.store(sink as *mut (), Ordering::Release);
}

#[doc(hidden)]
pub fn emit(args: fmt::Arguments<'_>) {
    let ptr = SINK.load(Ordering::Acquire);
    if ptr.is_null() {
        return;
    }
    // Only `set_sink` stores into SINK, always from a `Sink`.
    let sink = unsafe { core::mem::transmute::<*mut (), Sink>(ptr) };
    sink(args);
}

/// Displays a byte string such as a file name, escaping anything that is
/// not printable ASCII.
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                fmt::Write::write_char(f, b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        $crate::log::emit(format_args!(concat!("[kernel] ", $msg, "\n")))
    };
}

#[macro_export]
macro_rules! logf {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::log::emit(format_args!(concat!("[kernel] ", $fmt, "\n"), $($arg)*))
    };
}
