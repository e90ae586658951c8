//! Error types for the flash emulator

use core::fmt;
use std::io;
use thiserror::Error;

/// Which of the two mappings an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The private read/write mapping
    Writable,
    /// The read-only alias
    ReadOnly,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writable => write!(f, "read/write"),
            Self::ReadOnly => write!(f, "read-only"),
        }
    }
}

/// The region a range check was performed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The mapped flash region
    Device,
    /// The caller's source buffer of a write
    Source,
    /// The backing file itself
    Storage,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "flash device"),
            Self::Source => write!(f, "source buffer"),
            Self::Storage => write!(f, "backing storage"),
        }
    }
}

/// Coarse classification of a [`FlashError`]
///
/// Test code usually only cares about which class of precondition failed;
/// the variants of [`FlashError`] carry the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An alignment or argument precondition was violated
    InvalidArgument,
    /// The underlying memory mapping could not be established
    Mapping,
    /// An offset/length pair runs past a buffer or the device
    OutOfRange,
    /// An I/O call on the backing storage failed
    Io,
    /// The platform cannot provide shared file mappings
    NotSupported,
}

/// Flash emulator errors
#[derive(Debug, Error)]
pub enum FlashError {
    /// Length is not a multiple of the required unit
    #[error("length {length} must be a multiple of {align}")]
    LengthNotAligned { length: usize, align: usize },

    /// An offset is not aligned to the required unit
    #[error("{param} {value:#x} must be aligned to {align} bytes")]
    OffsetNotAligned {
        param: &'static str,
        value: usize,
        align: usize,
    },

    /// A device cannot cover zero bytes
    #[error("cannot map an empty flash region")]
    EmptyMapping,

    /// Emulator configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// mmap() failed for one of the views
    #[error("failed to map {view} view ({length} bytes at offset {offset:#x}): {source}")]
    Mapping {
        view: View,
        length: usize,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// Range check failure
    #[error("range {start:#x}..{end:#x} exceeds {target} of {limit} bytes")]
    OutOfRange {
        target: Bound,
        start: u64,
        end: u64,
        limit: u64,
    },

    /// I/O error on the backing storage
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Operation not available on this platform
    #[error("not supported: {0}")]
    NotSupported(&'static str),
}

impl FlashError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthNotAligned { .. }
            | Self::OffsetNotAligned { .. }
            | Self::EmptyMapping
            | Self::InvalidConfig(_) => ErrorKind::InvalidArgument,
            Self::Mapping { .. } => ErrorKind::Mapping,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Io(_) => ErrorKind::Io,
            Self::NotSupported(_) => ErrorKind::NotSupported,
        }
    }

    /// Numeric error code following the usual errno conventions
    ///
    /// Mapping and I/O failures report the OS error when one is available.
    pub fn errno(&self) -> i32 {
        match self {
            Self::Mapping { source, .. } => source.raw_os_error().unwrap_or(libc::ENOMEM),
            Self::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
            Self::OutOfRange { .. } => libc::ERANGE,
            Self::NotSupported(_) => libc::ENOSYS,
            _ => libc::EINVAL,
        }
    }

    pub(crate) fn out_of_range(target: Bound, start: usize, len: usize, limit: usize) -> Self {
        Self::OutOfRange {
            target,
            start: start as u64,
            end: (start as u64).saturating_add(len as u64),
            limit: limit as u64,
        }
    }
}

/// Result type for flash emulator operations
pub type Result<T> = core::result::Result<T, FlashError>;
