//! Emulated device constants and per-device configuration

use crate::error::{FlashError, Result};

/// Erase unit of the emulated NAND ("NV page")
pub const NV_PAGE_SIZE: usize = 4096;

/// Minimum programmable unit; write offsets and lengths must be multiples
pub const WORD_SIZE: usize = 4;

/// Address requested for the read-only view
///
/// This is only a hint: the kernel may place the mapping elsewhere, in which
/// case the view is still usable through [`FlashDevice::readonly_view`].
///
/// [`FlashDevice::readonly_view`]: crate::FlashDevice::readonly_view
pub const BLOCK_STORE_ADDRESS: usize = 0x0801_0000;

/// Value of every byte after an erase
pub const ERASED_BYTE: u8 = 0xFF;

/// Offset alignment enforced by erase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EraseAlignment {
    /// Erase offsets must fall on a page boundary, as on real NAND
    #[default]
    Page,
    /// Erase offsets only need word alignment (legacy mock behaviour)
    Word,
}

/// Configuration for a [`FlashDevice`](crate::FlashDevice)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashConfig {
    /// Erase unit in bytes
    pub page_size: usize,
    /// Offset alignment rule for erase
    pub erase_alignment: EraseAlignment,
    /// Address hint for the read-only view (`None` lets the kernel choose)
    pub readonly_hint: Option<usize>,
    /// Map the read-only view with `PROT_EXEC` as well
    pub readonly_exec: bool,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            page_size: NV_PAGE_SIZE,
            erase_alignment: EraseAlignment::Page,
            readonly_hint: Some(BLOCK_STORE_ADDRESS),
            readonly_exec: false,
        }
    }
}

impl FlashConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_erase_alignment(mut self, alignment: EraseAlignment) -> Self {
        self.erase_alignment = alignment;
        self
    }

    pub fn with_readonly_hint(mut self, hint: Option<usize>) -> Self {
        self.readonly_hint = hint;
        self
    }

    pub fn with_readonly_exec(mut self, exec: bool) -> Self {
        self.readonly_exec = exec;
        self
    }

    /// Required alignment of an erase offset
    pub fn erase_offset_align(&self) -> usize {
        match self.erase_alignment {
            EraseAlignment::Page => self.page_size,
            EraseAlignment::Word => WORD_SIZE,
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FlashError::InvalidConfig("page size must be non-zero"));
        }
        if self.page_size % WORD_SIZE != 0 {
            return Err(FlashError::InvalidConfig(
                "page size must be a multiple of the word size",
            ));
        }
        Ok(())
    }
}
