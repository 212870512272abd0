use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    println!("cargo:rerun-if-changed=kernel.ld");
    println!("cargo:rerun-if-env-changed=SHELL_BIN");

    // Host builds (tests, tooling) link normally.
    if target_arch != "riscv32" {
        return;
    }

    println!(
        "cargo:rustc-link-arg-bin=kernel=-T{}",
        manifest_dir.join("kernel.ld").display()
    );
    println!("cargo:rustc-link-arg-bin=kernel=-Map=kernel.map");

    if env::var_os("SHELL_BIN").is_none() {
        // The boot binary embeds the user shell image via env!("SHELL_BIN").
        println!("cargo:warning=SHELL_BIN is not set; build the shell and run `imgtool flat` first");
    }
}
