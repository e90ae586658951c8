//! nandmock-core - NAND flash emulation over a memory-mapped file
//!
//! This crate emulates the raw semantics of a NAND flash device on top of an
//! ordinary file. The backing bytes are mapped twice:
//!
//! - a private read/write view, only ever mutated through [`FlashDevice`]
//! - a read-only view of the same storage, placed at a well-known address
//!   when the platform honors the hint, that firmware under test reads
//!   directly
//!
//! Writes follow flash rules: a program operation can only clear bits
//! (`old & new`), and only an erase brings bytes back to `0xFF`.
//!
//! # Example
//!
//! ```ignore
//! use nandmock_core::FlashDevice;
//! use std::fs::OpenOptions;
//!
//! let file = OpenOptions::new().read(true).write(true).open("nand.bin")?;
//! let mut flash = FlashDevice::new(&file, 40960, 0)?;
//!
//! flash.erase(0, 40960)?;
//! flash.program(0, b"abcd")?;
//! flash.program(0, b"ABCD")?;
//! flash.program(0, b"abcd")?; // bit 5 stays cleared
//! assert_eq!(&flash.readonly_view()[..4], b"ABCD");
//!
//! flash.destroy();
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod fault;
pub mod mapping;

pub use config::{
    EraseAlignment, FlashConfig, BLOCK_STORE_ADDRESS, ERASED_BYTE, NV_PAGE_SIZE, WORD_SIZE,
};
pub use device::FlashDevice;
pub use error::{Bound, ErrorKind, FlashError, Result, View};
pub use fault::{probe_readonly_write, FaultProbe};
pub use mapping::{Mapping, Protection};
