use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=user.ld");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() == "riscv32" {
        println!(
            "cargo:rustc-link-arg-bins=-T{}",
            manifest_dir.join("user.ld").display()
        );
    }
}
