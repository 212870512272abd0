use std::collections::{HashMap, VecDeque};
use std::ffi::CStr;

use program::Sys;
use program::shell::{self, Flow, LINE_MAX};

/// Console and file calls served from memory.
#[derive(Default)]
struct FakeSys {
    input: VecDeque<u8>,
    output: Vec<u8>,
    files: HashMap<Vec<u8>, Vec<u8>>,
}

impl FakeSys {
    fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Sys for FakeSys {
    fn putchar(&mut self, ch: u8) {
        self.output.push(ch);
    }

    fn getchar(&mut self) -> u8 {
        self.input.pop_front().expect("shell read past the scripted input")
    }

    fn readfile(&mut self, name: &CStr, buf: &mut [u8]) -> Option<usize> {
        let data = self.files.get(name.to_bytes())?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Some(n)
    }

    fn writefile(&mut self, name: &CStr, data: &[u8]) -> Option<usize> {
        let file = self.files.get_mut(name.to_bytes())?;
        *file = data.to_vec();
        Some(data.len())
    }
}

#[test]
fn test_hello_echoes_and_greets() {
    let mut sys = FakeSys::with_input(b"hello\r");
    assert_eq!(shell::run_once(&mut sys), Flow::Continue);
    assert_eq!(sys.output(), "> hello\r\nHello world from shell!\n");
}

#[test]
fn test_newline_also_ends_a_line() {
    let mut sys = FakeSys::with_input(b"hello\n");
    assert_eq!(shell::run_once(&mut sys), Flow::Continue);
    assert_eq!(sys.output(), "> hello\nHello world from shell!\n");
}

#[test]
fn test_exit_stops_run() {
    let mut sys = FakeSys::with_input(b"hello\rexit\r");
    shell::run(&mut sys);
    assert!(sys.input.is_empty());
    assert!(sys.output().ends_with("> exit\r\n"));
}

#[test]
fn test_unknown_command() {
    let mut sys = FakeSys::with_input(b"ls\r");
    assert_eq!(shell::run_once(&mut sys), Flow::Continue);
    assert_eq!(sys.output(), "> ls\r\nunknown command: ls\n");
}

#[test]
fn test_empty_line_prompts_again() {
    let mut sys = FakeSys::with_input(b"\r");
    assert_eq!(shell::run_once(&mut sys), Flow::Continue);
    assert_eq!(sys.output(), "> \r\n");
}

#[test]
fn test_line_too_long() {
    let input = vec![b'a'; LINE_MAX];
    let mut sys = FakeSys::with_input(&input);
    assert_eq!(shell::run_once(&mut sys), Flow::Continue);

    let expected = format!("> {}\ncommand line too long\n", "a".repeat(LINE_MAX));
    assert_eq!(sys.output(), expected);
    assert!(sys.input.is_empty());
}

#[test]
fn test_longest_line_is_executed() {
    let mut input = vec![b'a'; LINE_MAX - 1];
    input.push(b'\r');
    let mut sys = FakeSys::with_input(&input);
    shell::run_once(&mut sys);
    assert!(sys.output().contains("unknown command: "));
    assert!(!sys.output().contains("too long"));
}

#[test]
fn test_readfile_prints_contents() {
    let mut sys = FakeSys::with_input(b"readfile\r");
    sys.files.insert(b"hello.txt".to_vec(), b"Can you see me?".to_vec());
    shell::run_once(&mut sys);
    assert_eq!(sys.output(), "> readfile\r\nCan you see me?\n");
}

#[test]
fn test_readfile_missing() {
    let mut sys = FakeSys::with_input(b"readfile\r");
    shell::run_once(&mut sys);
    assert_eq!(sys.output(), "> readfile\r\nreadfile: hello.txt not found\n");
}

#[test]
fn test_writefile_then_readfile() {
    let mut sys = FakeSys::with_input(b"writefile\rreadfile\r");
    sys.files.insert(b"hello.txt".to_vec(), b"old".to_vec());

    shell::run_once(&mut sys);
    assert_eq!(sys.files[b"hello.txt".as_slice()], b"Hello from shell!\n");

    sys.output.clear();
    shell::run_once(&mut sys);
    println!("{}", sys.output());
    assert_eq!(sys.output(), "> readfile\r\nHello from shell!\n\n");
}

#[test]
fn test_writefile_missing() {
    let mut sys = FakeSys::with_input(b"writefile\r");
    shell::run_once(&mut sys);
    assert!(sys.output().ends_with("writefile: hello.txt not found\n"));
}

#[test]
fn test_host_syscalls_report_failure() {
    // Without a kernel underneath, every raw call returns the sentinel.
    assert_eq!(program::syscall::syscall(types::SYS_GETCHAR, 0, 0, 0), types::SYSCALL_ERROR);
    let mut buf = [0u8; 4];
    assert_eq!(program::syscall::readfile(c"hello.txt", &mut buf), None);
    assert_eq!(program::syscall::writefile(c"hello.txt", b"x"), None);
}
