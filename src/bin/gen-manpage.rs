//! Man page generator for nandmock
//!
//! Writes `nandmock.1` plus one `nandmock-<command>.1` page per subcommand.
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};

#[allow(dead_code)]
#[path = "../cli.rs"]
mod cli;

fn render(cmd: clap::Command, path: &Path) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd).render(&mut buffer)?;
    fs::write(path, buffer)?;
    println!("  {}", path.display());
    Ok(())
}

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    println!("Generating man pages in {}:", output_dir.display());

    for sub in cmd.get_subcommands() {
        let file = format!("nandmock-{}.1", sub.get_name());
        render(sub.clone(), &output_dir.join(file))?;
    }
    render(cmd, &output_dir.join("nandmock.1"))?;

    println!("\nTo view: man -l {}", output_dir.join("nandmock.1").display());
    Ok(())
}
