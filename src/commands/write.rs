//! Write command implementation

use nandmock_core::FlashDevice;
use std::path::Path;

/// Run the write command
///
/// Programs `length` bytes of `input`, starting at `data_offset` within the
/// file, at flash address `start`. Without `length` the rest of the file is
/// written; it must still come out word aligned.
pub fn run_write(
    flash: &mut FlashDevice,
    input: &Path,
    start: usize,
    data_offset: usize,
    length: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input)?;
    println!("Read {} bytes from {:?}", data.len(), input);

    let length = match length {
        Some(len) => len,
        None => data.len().checked_sub(data_offset).ok_or_else(|| {
            format!(
                "Data offset {} is beyond the end of the input ({} bytes)",
                data_offset,
                data.len()
            )
        })?,
    };

    flash.write(start, &data, length, data_offset)?;
    flash.flush()?;

    // AND semantics: anything not already erased may not read back as written
    let written = &flash.readonly_view()[start..start + length];
    let expected = &data[data_offset..data_offset + length];
    let differing = written.iter().zip(expected).filter(|(a, b)| a != b).count();
    if differing > 0 {
        log::warn!(
            "{} byte(s) differ from the input; target region was not fully erased",
            differing
        );
    }

    println!("Wrote {} bytes at 0x{:08X}", length, start);
    Ok(())
}
