//! Erase command implementation

use super::region_len;
use nandmock_core::FlashDevice;

/// Run the erase command
pub fn run_erase(
    flash: &mut FlashDevice,
    start: usize,
    length: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let length = region_len(flash.len(), start, length)?;

    flash.erase(start, length)?;
    flash.flush()?;

    println!("Erased {} bytes starting at 0x{:08X}", length, start);
    Ok(())
}
