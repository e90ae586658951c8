//! Read and verify command implementations

use super::region_len;
use nandmock_core::FlashDevice;
use std::fmt::Write as _;
use std::path::Path;

/// Bytes per hex dump line
const DUMP_WIDTH: usize = 16;

/// Run the read command
pub fn run_read(
    flash: &FlashDevice,
    start: usize,
    length: Option<usize>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let length = region_len(flash.len(), start, length)?;
    let mut data = vec![0u8; length];
    flash.read(start, &mut data)?;

    match output {
        Some(path) => {
            std::fs::write(path, &data)?;
            println!("Wrote {} bytes to {:?}", data.len(), path);
        }
        None => print!("{}", hexdump(start, &data)),
    }
    Ok(())
}

/// Run the verify command
pub fn run_verify(
    flash: &FlashDevice,
    input: &Path,
    start: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected = std::fs::read(input)?;
    println!("Read {} bytes from {:?}", expected.len(), input);

    let mut actual = vec![0u8; expected.len()];
    flash.read(start, &mut actual)?;

    if let Some(pos) = actual.iter().zip(&expected).position(|(a, e)| a != e) {
        return Err(format!(
            "Verification failed at 0x{:08X}: expected 0x{:02X}, found 0x{:02X}",
            start + pos,
            expected[pos],
            actual[pos]
        )
        .into());
    }

    println!("Verification passed!");
    Ok(())
}

/// Format `data` as a classic hex dump, addresses starting at `base`
pub fn hexdump(base: usize, data: &[u8]) -> String {
    let mut out = String::new();
    for (i, line) in data.chunks(DUMP_WIDTH).enumerate() {
        let _ = write!(out, "{:08x} ", base + i * DUMP_WIDTH);
        for col in 0..DUMP_WIDTH {
            match line.get(col) {
                Some(b) => {
                    let _ = write!(out, " {:02x}", b);
                }
                None => out.push_str("   "),
            }
        }
        out.push_str("  |");
        out.extend(line.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
    out
}
