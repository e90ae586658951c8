//! Self test command implementation
//!
//! Runs the emulation checks against the real backing file: aliasing of the
//! two views, plain programming, the one-way 1 -> 0 bit rule, alignment
//! rejection and write protection of the read-only view.

use nandmock_core::{probe_readonly_write, ErrorKind, FaultProbe, FlashDevice};

const ALIAS_MESSAGE: &[u8] = b"If you can read this, that is good.\0";
const WRITE_MESSAGE: &[u8] = b"Normal Write Test   ";
const UNALIGNED_MESSAGE: &[u8] = b"Normal Write Test    ";
const LOWER_CASE: &[u8] = b"abcdefghijkl";
const UPPER_CASE: &[u8] = b"ABCDEFGHIJKL";

/// Collects PASS/FAIL lines
#[derive(Default)]
struct Report {
    failed: usize,
}

impl Report {
    fn check(&mut self, name: &str, ok: bool, flash: &FlashDevice, len: usize) {
        if ok {
            println!("{} -> PASS", name);
        } else {
            self.failed += 1;
            println!("{} -> FAIL", name);
            let len = len.min(flash.len());
            println!(
                "  Value on RW Page -> {}",
                String::from_utf8_lossy(&flash.as_slice()[..len])
            );
            println!(
                "  Value on RO Page -> {}",
                String::from_utf8_lossy(&flash.readonly_view()[..len])
            );
        }
    }
}

/// Run the self test; the device contents are destroyed
pub fn run_selftest(flash: &mut FlashDevice) -> Result<(), Box<dyn std::error::Error>> {
    let page_size = flash.config().page_size;
    let whole = flash.len() - flash.len() % page_size;
    if whole == 0 {
        return Err(format!(
            "Device ({} bytes) is smaller than one page ({} bytes)",
            flash.len(),
            page_size
        )
        .into());
    }
    let mut report = Report::default();

    // RO follows RW
    flash.erase(0, whole)?;
    flash.program(0, ALIAS_MESSAGE)?;
    let ok = flash.readonly_view().starts_with(ALIAS_MESSAGE)
        && flash.as_slice()[..whole] == flash.readonly_view()[..whole];
    report.check("RO Follows RW Page", ok, flash, ALIAS_MESSAGE.len());

    // Erase
    flash.erase(0, whole)?;
    let ok = flash.readonly_view()[..whole].iter().all(|&b| b == 0xFF);
    report.check("erase", ok, flash, 0);

    // Normal write
    flash.program(0, WRITE_MESSAGE)?;
    let ok = flash.readonly_view().starts_with(WRITE_MESSAGE);
    report.check("write", ok, flash, WRITE_MESSAGE.len());

    // Unaligned length must be rejected without touching memory
    flash.erase(0, whole)?;
    let before = flash.as_slice()[..whole].to_vec();
    let rejected = flash
        .write(0, UNALIGNED_MESSAGE, UNALIGNED_MESSAGE.len(), 0)
        .is_err_and(|e| e.kind() == ErrorKind::InvalidArgument);
    let ok = rejected && flash.as_slice()[..whole] == before[..];
    report.check("write[unaligned length]", ok, flash, UNALIGNED_MESSAGE.len());

    // Bit 5 separates lower from upper case: clearing it works, setting it
    // again without an erase must not.
    flash.program(0, LOWER_CASE)?;
    let ok = flash.readonly_view().starts_with(LOWER_CASE);
    report.check("write[nand_emulation] setup", ok, flash, LOWER_CASE.len());

    flash.program(0, UPPER_CASE)?;
    let ok = flash.readonly_view().starts_with(UPPER_CASE);
    report.check("write[nand_emulation] stage 1", ok, flash, UPPER_CASE.len());

    flash.program(0, LOWER_CASE)?;
    let ok = flash.readonly_view().starts_with(UPPER_CASE);
    report.check("write[nand_emulation]", ok, flash, UPPER_CASE.len());

    // Write protection of the RO page
    match probe_readonly_write(flash)? {
        FaultProbe::Faulted(sig) => {
            println!("RO page write protection -> PASS (signal {})", sig)
        }
        other => {
            report.failed += 1;
            println!("RO page write protection -> FAIL ({:?})", other);
        }
    }

    flash.erase(0, whole)?;
    flash.flush()?;

    if report.failed > 0 {
        return Err(format!("{} self test check(s) failed", report.failed).into());
    }
    println!("All self test checks passed");
    Ok(())
}
