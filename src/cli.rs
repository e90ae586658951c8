//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Device size used by the test harness (ten NV pages)
pub const DEFAULT_DEVICE_SIZE: usize = 40960;

/// Parse a string as a hex or decimal usize
fn parse_hex_usize(s: &str) -> Result<usize, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<usize>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "nandmock")]
#[command(author, version, about = "NAND flash emulator over a backing file", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Backing file and emulator options shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Backing file holding the flash contents (created if missing)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Size of the emulated flash in bytes (hex or decimal)
    #[arg(long, value_parser = parse_hex_usize, default_value_t = DEFAULT_DEVICE_SIZE)]
    pub size: usize,

    /// Offset of the flash within the backing file (multiple of the system page size)
    #[arg(long, value_parser = parse_hex_usize, default_value_t = 0)]
    pub offset: usize,

    /// Erase page size in bytes
    #[arg(long, value_parser = parse_hex_usize, default_value_t = nandmock_core::NV_PAGE_SIZE)]
    pub page_size: usize,

    /// Only require word alignment for erase offsets (legacy behaviour)
    #[arg(long)]
    pub relaxed_erase: bool,

    /// Let the kernel place the read-only view anywhere
    #[arg(long)]
    pub no_hint: bool,

    /// Map the read-only view executable as well
    #[arg(long)]
    pub exec: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how the emulated flash is mapped
    Info {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Erase a region back to 0xFF
    Erase {
        #[command(flatten)]
        device: DeviceArgs,

        /// Start address (hex, e.g., 0x1000)
        #[arg(long, value_parser = parse_hex_usize, default_value_t = 0)]
        start: usize,

        /// Length of region to erase (defaults to the whole device)
        #[arg(long, value_parser = parse_hex_usize)]
        length: Option<usize>,
    },

    /// Program a file into flash (bits can only be cleared)
    Write {
        #[command(flatten)]
        device: DeviceArgs,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Flash address to write at
        #[arg(long, value_parser = parse_hex_usize, default_value_t = 0)]
        start: usize,

        /// Offset into the input file
        #[arg(long, value_parser = parse_hex_usize, default_value_t = 0)]
        data_offset: usize,

        /// Number of bytes to write (defaults to the rest of the input)
        #[arg(long, value_parser = parse_hex_usize)]
        length: Option<usize>,
    },

    /// Read flash contents through the read-only view
    Read {
        #[command(flatten)]
        device: DeviceArgs,

        /// Start address
        #[arg(long, value_parser = parse_hex_usize, default_value_t = 0)]
        start: usize,

        /// Number of bytes to read (defaults to the rest of the device)
        #[arg(long, value_parser = parse_hex_usize)]
        length: Option<usize>,

        /// Output file path (hex dump to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify flash contents against file
    Verify {
        #[command(flatten)]
        device: DeviceArgs,

        /// Input file path to verify against
        #[arg(short, long)]
        input: PathBuf,

        /// Flash address the file should match at
        #[arg(long, value_parser = parse_hex_usize, default_value_t = 0)]
        start: usize,
    },

    /// Run the emulation self test against the backing file (destroys its contents)
    Selftest {
        #[command(flatten)]
        device: DeviceArgs,
    },
}

impl Commands {
    /// Device options of the selected command
    pub fn device(&self) -> &DeviceArgs {
        match self {
            Self::Info { device }
            | Self::Erase { device, .. }
            | Self::Write { device, .. }
            | Self::Read { device, .. }
            | Self::Verify { device, .. }
            | Self::Selftest { device } => device,
        }
    }
}
