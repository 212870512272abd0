#![no_std]
#![no_main]

use program::{Kernel, entrypoint, shell};

entrypoint!(main);

fn main() {
    shell::run(&mut Kernel);
}
