/// Declare a program's main function.
///
/// Emits the `start` symbol that `user.ld` places first in the image. It
/// points sp at `__stack_top`, calls `$func`, and exits when `$func` returns.
#[macro_export]
macro_rules! entrypoint {
    ($func:path) => {
        #[cfg(target_arch = "riscv32")]
        core::arch::global_asm!(
            ".section .text.start",
            ".globl start",
            "start:",
            "    la sp, __stack_top",
            "    call {main}",
            "    call {exit}",
            main = sym __program_main,
            exit = sym __program_exit,
        );

        #[allow(dead_code)]
        extern "C" fn __program_main() {
            $func();
        }

        #[allow(dead_code)]
        extern "C" fn __program_exit() -> ! {
            $crate::syscall::exit()
        }
    };
}
