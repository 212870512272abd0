#[cfg(target_arch = "riscv32")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;

    let mut out = crate::io::Writer(&mut crate::Kernel);
    if let Some(location) = info.location() {
        let _ = write!(out, "panic at {}:{}: ", location.file(), location.line());
    }
    let _ = writeln!(out, "{}", info.message());
    crate::syscall::exit()
}
