use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::PathBuf;

use imgtool::{build_disk, list_disk, parse_elf_from_bytes};

/// Build the images the kernel boots from
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a user ELF into a raw image loaded at USER_BASE
    Flat {
        /// Input ELF file
        elf: PathBuf,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,

        /// Accept an image whose lowest load address is not USER_BASE
        #[arg(long)]
        any_base: bool,
    },
    /// Pack files into a TAR disk image
    Mkdisk {
        /// Files to store, named by their file name
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output disk image
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the files in a disk image
    Ls {
        disk: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    match Args::parse().command {
        Command::Flat { elf, output, any_base } => flat(elf, output, any_base),
        Command::Mkdisk { files, output } => mkdisk(files, output),
        Command::Ls { disk, format } => ls(disk, format),
    }
}

fn flat(elf: PathBuf, output: PathBuf, any_base: bool) -> Result<()> {
    let bytes = fs::read(&elf).with_context(|| format!("Failed to read {}", elf.display()))?;
    let info = parse_elf_from_bytes(&bytes).with_context(|| format!("Failed to parse {}", elf.display()))?;
    let Some((image, base)) = info.get_flat_image() else {
        bail!("{} has no loadable segments", elf.display());
    };

    if base != types::USER_BASE as u64 && !any_base {
        bail!(
            "{} is linked at {:#x}, expected {:#x} (pass --any-base to allow)",
            elf.display(),
            base,
            types::USER_BASE
        );
    }
    if info.entry != base {
        println!(
            "{} entry {:#x} is not the image base {:#x}",
            "warning:".yellow().bold(),
            info.entry,
            base
        );
    }

    fs::write(&output, &image).with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "{} {} ({} bytes, base {:#x}, {} segments)",
        "wrote".green().bold(),
        output.display(),
        image.len(),
        base,
        info.segments.len()
    );
    Ok(())
}

fn mkdisk(files: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    let mut entries = Vec::new();
    for path in &files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            bail!("cannot name {} inside the image", path.display());
        };
        let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        entries.push((name.to_string(), data));
    }

    let image = build_disk(&entries)?;
    fs::write(&output, &image).with_context(|| format!("Failed to write {}", output.display()))?;

    for (name, data) in &entries {
        println!("  {} {} ({} bytes)", "+".green(), name, data.len());
    }
    println!("{} {} ({} bytes)", "wrote".green().bold(), output.display(), image.len());
    Ok(())
}

fn ls(disk: PathBuf, format: Format) -> Result<()> {
    let image = fs::read(&disk).with_context(|| format!("Failed to read {}", disk.display()))?;
    let entries = list_disk(&image)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        Format::Text => {
            if entries.is_empty() {
                println!("{}", "(empty)".dimmed());
            }
            for entry in &entries {
                println!("{:>6}  {}", entry.size, entry.name.bold());
            }
        }
    }
    Ok(())
}
