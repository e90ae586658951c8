//! CLI command implementations
//!
//! Each command receives an already mapped [`FlashDevice`]; opening the
//! backing file and turning the CLI options into a [`FlashConfig`] happens
//! here so every command sees the same device setup.

pub mod erase;
pub mod info;
pub mod read;
pub mod selftest;
pub mod write;

use crate::cli::DeviceArgs;
use nandmock_core::{EraseAlignment, FlashConfig, FlashDevice, BLOCK_STORE_ADDRESS};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Build the emulator configuration from CLI options
pub fn config_from_args(args: &DeviceArgs) -> FlashConfig {
    let erase_alignment = if args.relaxed_erase {
        EraseAlignment::Word
    } else {
        EraseAlignment::Page
    };
    let hint = if args.no_hint {
        None
    } else {
        Some(BLOCK_STORE_ADDRESS)
    };

    FlashConfig::default()
        .with_page_size(args.page_size)
        .with_erase_alignment(erase_alignment)
        .with_readonly_hint(hint)
        .with_readonly_exec(args.exec)
}

/// Open the backing file, creating it or growing it to cover the device
///
/// New space reads as zeros, like a freshly created file would.
pub fn open_backing(path: &Path, required_len: u64) -> std::io::Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    let current = file.metadata()?.len();
    if current < required_len {
        log::info!(
            "Extending {} from {} to {} bytes",
            path.display(),
            current,
            required_len
        );
        file.set_len(required_len)?;
    }
    Ok(file)
}

/// Open the backing file and map it as an emulated flash device
///
/// The file handle is closed again before returning; the mappings keep the
/// contents reachable.
pub fn open_device(args: &DeviceArgs) -> Result<FlashDevice, Box<dyn std::error::Error>> {
    let required_len = (args.offset as u64)
        .checked_add(args.size as u64)
        .ok_or_else(|| {
            format!(
                "Device of {} bytes at offset {:#x} exceeds the addressable file size",
                args.size, args.offset
            )
        })?;
    let file = open_backing(&args.file, required_len)?;
    let config = config_from_args(args);
    let flash = FlashDevice::with_config(&file, args.size, args.offset as u64, config)?;

    log::debug!(
        "Mapped {} ({} bytes at offset {:#x})",
        args.file.display(),
        args.size,
        args.offset
    );
    Ok(flash)
}

/// Length of a region at `start`, defaulting to the rest of the device
pub(crate) fn region_len(
    total: usize,
    start: usize,
    length: Option<usize>,
) -> Result<usize, String> {
    match length {
        Some(len) => Ok(len),
        None => total.checked_sub(start).ok_or_else(|| {
            format!(
                "Start address 0x{:08X} is outside the device (0x{:08X} bytes)",
                start, total
            )
        }),
    }
}
