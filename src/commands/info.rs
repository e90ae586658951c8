//! Info command implementation

use crate::cli::DeviceArgs;
use nandmock_core::FlashDevice;

/// Print how the emulated flash is mapped
pub fn run_info(flash: &FlashDevice, args: &DeviceArgs) {
    let config = flash.config();

    println!("Emulated NAND Flash");
    println!("===================");
    println!();
    println!("Backing file:    {}", args.file.display());
    println!("Storage offset:  0x{:08X}", flash.storage_offset());
    println!(
        "Size:            {} bytes ({} pages)",
        flash.len(),
        flash.len() / config.page_size
    );
    println!("Page size:       {} bytes", config.page_size);
    println!("Erase alignment: {:?}", config.erase_alignment);
    println!();
    println!("R/W view:        {:p}", flash.writable_ptr());
    println!("R/O view:        {:p}", flash.readonly_ptr());
    match config.readonly_hint {
        Some(hint) if flash.readonly_at_hint() => {
            println!("R/O hint:        0x{:08X} (honored)", hint)
        }
        Some(hint) => println!("R/O hint:        0x{:08X} (not honored)", hint),
        None => println!("R/O hint:        none"),
    }

    let erased = flash
        .readonly_view()
        .chunks(config.page_size)
        .filter(|page| page.iter().all(|&b| b == nandmock_core::ERASED_BYTE))
        .count();
    println!("Erased pages:    {}", erased);
}
