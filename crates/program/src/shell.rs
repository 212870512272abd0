//! Line-oriented command shell.

use core::ffi::CStr;

use crate::Sys;

pub const PROMPT: &str = "> ";
pub const LINE_MAX: usize = 128;

const HELLO_FILE: &CStr = c"hello.txt";
const GREETING: &[u8] = b"Hello from shell!\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Run commands until `exit`.
pub fn run<S: Sys + ?Sized>(sys: &mut S) {
    while run_once(sys) == Flow::Continue {}
}

/// Prompt, read one line, and execute it.
pub fn run_once<S: Sys + ?Sized>(sys: &mut S) -> Flow {
    sys.write_bytes(PROMPT.as_bytes());

    let mut line = [0u8; LINE_MAX];
    let mut len = 0;
    loop {
        let ch = sys.getchar();
        sys.putchar(ch);
        if ch == b'\r' || ch == b'\n' {
            if ch == b'\r' {
                sys.putchar(b'\n');
            }
            break;
        }
        // One byte stays reserved, matching a NUL-terminated line.
        if len == LINE_MAX - 1 {
            sys.write_bytes(b"\ncommand line too long\n");
            return Flow::Continue;
        }
        line[len] = ch;
        len += 1;
    }

    execute(sys, &line[..len])
}

fn execute<S: Sys + ?Sized>(sys: &mut S, cmd: &[u8]) -> Flow {
    match cmd {
        b"" => {}
        b"hello" => sys.write_bytes(b"Hello world from shell!\n"),
        b"exit" => return Flow::Exit,
        b"readfile" => {
            let mut buf = [0u8; LINE_MAX];
            match sys.readfile(HELLO_FILE, &mut buf) {
                Some(n) => {
                    let n = n.min(buf.len());
                    sys.write_bytes(&buf[..n]);
                    sys.putchar(b'\n');
                }
                None => sys.write_bytes(b"readfile: hello.txt not found\n"),
            }
        }
        b"writefile" => {
            if sys.writefile(HELLO_FILE, GREETING).is_none() {
                sys.write_bytes(b"writefile: hello.txt not found\n");
            }
        }
        other => {
            sys.write_bytes(b"unknown command: ");
            sys.write_bytes(other);
            sys.putchar(b'\n');
        }
    }
    Flow::Continue
}
