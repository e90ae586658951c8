//! nandmock - NAND flash emulation over a backing file
//!
//! Command-line harness around `nandmock-core`. Every command maps the
//! backing file as an emulated NAND device, performs one operation with
//! flash semantics (erase to 0xFF, program by clearing bits), and unmaps it
//! again, so the file can be shared with firmware tests between runs.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let mut flash = commands::open_device(cli.command.device())?;

    let result = match cli.command {
        Commands::Info { device } => {
            commands::info::run_info(&flash, &device);
            Ok(())
        }
        Commands::Erase {
            device: _,
            start,
            length,
        } => commands::erase::run_erase(&mut flash, start, length),
        Commands::Write {
            device: _,
            input,
            start,
            data_offset,
            length,
        } => commands::write::run_write(&mut flash, &input, start, data_offset, length),
        Commands::Read {
            device: _,
            start,
            length,
            output,
        } => commands::read::run_read(&flash, start, length, output.as_deref()),
        Commands::Verify {
            device: _,
            input,
            start,
        } => commands::read::run_verify(&flash, &input, start),
        Commands::Selftest { device: _ } => commands::selftest::run_selftest(&mut flash),
    };

    flash.destroy();
    result
}
