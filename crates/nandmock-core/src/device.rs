//! Emulated NAND flash device
//!
//! [`FlashDevice`] maps a range of a backing file twice: once read/write,
//! used only by [`erase`](FlashDevice::erase) and
//! [`write`](FlashDevice::write), and once read-only for code under test to
//! observe. Both views cover the same file offset and length for the whole
//! lifetime of the device, so any change made through the writable view is
//! immediately visible through the read-only one.

use crate::config::{FlashConfig, ERASED_BYTE, WORD_SIZE};
use crate::error::{Bound, FlashError, Result, View};
use crate::mapping::{Mapping, Protection};
#[cfg(unix)]
use std::os::fd::{AsFd, BorrowedFd};

/// Emulated NAND flash over a shared file mapping
///
/// The device owns both mappings. Dropping it, or calling
/// [`destroy`](Self::destroy), unmaps them; since `destroy` consumes the
/// device, using it afterwards does not compile.
#[derive(Debug)]
pub struct FlashDevice {
    writable: Mapping,
    readonly: Mapping,
    storage_offset: u64,
    config: FlashConfig,
}

impl FlashDevice {
    /// Map `length` bytes of `storage` at `storage_offset` with the default
    /// configuration
    #[cfg(unix)]
    pub fn new<F: AsFd>(storage: &F, length: usize, storage_offset: u64) -> Result<Self> {
        Self::with_config(storage, length, storage_offset, FlashConfig::default())
    }

    /// Map `length` bytes of `storage` at `storage_offset`
    ///
    /// `storage` only needs to stay open for the duration of this call.
    /// `storage_offset` must be a multiple of the system page size, which is
    /// enforced by the kernel and reported as a mapping error.
    ///
    /// # Errors
    /// * `EmptyMapping` - `length` is zero
    /// * `InvalidConfig` - `config` fails [`FlashConfig::validate`]
    /// * `OutOfRange` - `storage` is a regular file too short for the range
    /// * `Mapping` - either mmap call failed
    #[cfg(unix)]
    pub fn with_config<F: AsFd>(
        storage: &F,
        length: usize,
        storage_offset: u64,
        config: FlashConfig,
    ) -> Result<Self> {
        use crate::mapping::regular_file_len;

        config.validate()?;
        if length == 0 {
            return Err(FlashError::EmptyMapping);
        }

        let fd = storage.as_fd();
        let end = storage_offset
            .checked_add(length as u64)
            .ok_or(FlashError::OutOfRange {
                target: Bound::Storage,
                start: storage_offset,
                end: u64::MAX,
                limit: u64::MAX,
            })?;
        if let Some(file_len) = regular_file_len(fd)? {
            // Pages past EOF would raise SIGBUS on first access.
            if end > file_len {
                return Err(FlashError::OutOfRange {
                    target: Bound::Storage,
                    start: storage_offset,
                    end,
                    limit: file_len,
                });
            }
        }

        let mut ro_protection = Protection::READ;
        if config.readonly_exec {
            ro_protection |= Protection::EXEC;
        }
        let (writable, readonly) = map_views(
            fd,
            length,
            storage_offset,
            ro_protection,
            config.readonly_hint,
        )?;

        if let Some(hint) = config.readonly_hint {
            if !readonly.is_at(hint) {
                log::warn!(
                    "read-only view requested at {:#x} but mapped at {:p}",
                    hint,
                    readonly.as_ptr()
                );
            }
        }

        log::debug!(
            "flash device: {} bytes at storage offset {:#x}, rw={:p} ro={:p}",
            length,
            storage_offset,
            writable.as_ptr(),
            readonly.as_ptr()
        );

        Ok(Self {
            writable,
            readonly,
            storage_offset,
            config,
        })
    }

    #[cfg(not(unix))]
    pub fn with_config<F>(
        _storage: &F,
        _length: usize,
        _storage_offset: u64,
        _config: FlashConfig,
    ) -> Result<Self> {
        Err(FlashError::NotSupported(
            "flash emulation requires shared file mappings (unix only)",
        ))
    }

    /// Erase `length` bytes starting at `offset`, setting them to `0xFF`
    ///
    /// `length` must be a multiple of the page size and `offset` must
    /// satisfy the configured [`EraseAlignment`](crate::EraseAlignment).
    /// Nothing is modified if any check fails.
    pub fn erase(&mut self, offset: usize, length: usize) -> Result<()> {
        let page_size = self.config.page_size;
        if length % page_size != 0 {
            return Err(FlashError::LengthNotAligned {
                length,
                align: page_size,
            });
        }
        let align = self.config.erase_offset_align();
        if offset % align != 0 {
            return Err(FlashError::OffsetNotAligned {
                param: "erase offset",
                value: offset,
                align,
            });
        }
        let range = checked_range(offset, length, self.len(), Bound::Device)?;

        log::trace!("erase {:#x}..{:#x}", range.start, range.end);
        self.writable_mut()[range].fill(ERASED_BYTE);
        Ok(())
    }

    /// Program `length` bytes of `data`, starting at `data_offset`, into the
    /// device at `offset`
    ///
    /// Each target byte becomes `old & new`: bits can only go from 1 to 0.
    /// `length`, `offset` and `data_offset` must all be multiples of
    /// [`WORD_SIZE`]. All checks happen before the first byte is touched.
    ///
    /// # Errors
    /// * `LengthNotAligned` / `OffsetNotAligned` - word alignment violated
    /// * `OutOfRange` - the range runs past the device or past `data`
    pub fn write(
        &mut self,
        offset: usize,
        data: &[u8],
        length: usize,
        data_offset: usize,
    ) -> Result<()> {
        if length % WORD_SIZE != 0 {
            return Err(FlashError::LengthNotAligned {
                length,
                align: WORD_SIZE,
            });
        }
        if offset % WORD_SIZE != 0 {
            return Err(FlashError::OffsetNotAligned {
                param: "mock_offset",
                value: offset,
                align: WORD_SIZE,
            });
        }
        if data_offset % WORD_SIZE != 0 {
            return Err(FlashError::OffsetNotAligned {
                param: "data_offset",
                value: data_offset,
                align: WORD_SIZE,
            });
        }
        let src = checked_range(data_offset, length, data.len(), Bound::Source)?;
        let dst = checked_range(offset, length, self.len(), Bound::Device)?;

        log::trace!(
            "write {:#x}..{:#x} from data[{:#x}..]",
            dst.start,
            dst.end,
            src.start
        );
        // Flash can only clear bits; raising them needs an erase.
        for (cell, &byte) in self.writable_mut()[dst].iter_mut().zip(&data[src]) {
            *cell &= byte;
        }
        Ok(())
    }

    /// Program all of `data` at `offset`
    pub fn program(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        self.write(offset, data, data.len(), 0)
    }

    /// Copy bytes out of the read-only view
    pub fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        let range = checked_range(offset, buf.len(), self.len(), Bound::Device)?;
        buf.copy_from_slice(&self.readonly_view()[range]);
        Ok(())
    }

    /// Flush the device contents to the backing file
    pub fn flush(&self) -> Result<()> {
        self.writable.sync()?;
        Ok(())
    }

    /// Unmap both views and release the device
    pub fn destroy(self) {
        log::debug!(
            "destroying flash device ({} bytes at storage offset {:#x})",
            self.len(),
            self.storage_offset
        );
        // Mappings unmap themselves on drop.
        drop(self);
    }

    /// Contents as seen through the writable view
    pub fn as_slice(&self) -> &[u8] {
        self.writable.as_slice()
    }

    /// Contents as seen through the read-only view
    pub fn readonly_view(&self) -> &[u8] {
        self.readonly.as_slice()
    }

    /// Address of the read-only view
    ///
    /// Writing through this pointer must fault; it is exposed so tests can
    /// check exactly that (see [`probe_readonly_write`](crate::probe_readonly_write)).
    pub fn readonly_ptr(&self) -> *const u8 {
        self.readonly.as_ptr()
    }

    pub fn writable_ptr(&self) -> *const u8 {
        self.writable.as_ptr()
    }

    /// Whether the read-only view landed on the configured address hint
    pub fn readonly_at_hint(&self) -> bool {
        self.config
            .readonly_hint
            .is_some_and(|hint| self.readonly.is_at(hint))
    }

    /// Mapped length in bytes
    pub fn len(&self) -> usize {
        self.writable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the mapped range within the backing storage
    pub fn storage_offset(&self) -> u64 {
        self.storage_offset
    }

    pub fn config(&self) -> &FlashConfig {
        &self.config
    }

    fn writable_mut(&mut self) -> &mut [u8] {
        self.writable
            .as_mut_slice()
            .expect("writable view is always mapped READ | WRITE")
    }
}

/// Map the read/write view, then the read-only view, of the same range
///
/// Neither mapping outlives a failure: if the read-only view cannot be
/// created the writable one is dropped, and unmapped, before returning.
#[cfg(unix)]
pub(crate) fn map_views(
    fd: BorrowedFd<'_>,
    length: usize,
    storage_offset: u64,
    ro_protection: Protection,
    hint: Option<usize>,
) -> Result<(Mapping, Mapping)> {
    let mapping_error = |view: View| {
        move |source: std::io::Error| FlashError::Mapping {
            view,
            length,
            offset: storage_offset,
            source,
        }
    };

    let writable = Mapping::new(
        fd,
        length,
        storage_offset,
        Protection::READ | Protection::WRITE,
        None,
    )
    .map_err(mapping_error(View::Writable))?;
    let readonly = Mapping::new(fd, length, storage_offset, ro_protection, hint)
        .map_err(mapping_error(View::ReadOnly))?;

    Ok((writable, readonly))
}

/// `start..start + len`, provided it fits within `limit`
fn checked_range(
    start: usize,
    len: usize,
    limit: usize,
    target: Bound,
) -> Result<core::ops::Range<usize>> {
    match start.checked_add(len) {
        Some(end) if end <= limit => Ok(start..end),
        _ => Err(FlashError::out_of_range(target, start, len, limit)),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{EraseAlignment, NV_PAGE_SIZE};
    use crate::error::ErrorKind;
    use std::fs::File;
    use std::io::{Read, Seek, SeekFrom, Write};

    const DEVICE_SIZE: usize = 40960;

    fn backing(len: usize, fill: u8) -> File {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&vec![fill; len]).unwrap();
        file
    }

    fn device(fill: u8) -> (File, FlashDevice) {
        let file = backing(DEVICE_SIZE, fill);
        let flash = FlashDevice::new(&file, DEVICE_SIZE, 0).unwrap();
        (file, flash)
    }

    fn assert_views_agree(flash: &FlashDevice) {
        assert!(flash.as_slice() == flash.readonly_view());
    }

    #[test]
    fn test_ro_follows_rw() {
        let (_file, mut flash) = device(0x00);
        flash.erase(0, DEVICE_SIZE).unwrap();
        flash.program(0, b"If you can read this, that is good.\0").unwrap();

        assert_eq!(&flash.readonly_view()[..35], b"If you can read this, that is good.");
        assert_ne!(flash.readonly_ptr(), flash.writable_ptr());
        assert_views_agree(&flash);
    }

    #[test]
    fn test_erase_resets_to_ones() {
        let (_file, mut flash) = device(0x00);
        flash.erase(NV_PAGE_SIZE, 2 * NV_PAGE_SIZE).unwrap();

        let data = flash.readonly_view();
        assert!(data[..NV_PAGE_SIZE].iter().all(|&b| b == 0x00));
        assert!(data[NV_PAGE_SIZE..3 * NV_PAGE_SIZE].iter().all(|&b| b == 0xFF));
        assert!(data[3 * NV_PAGE_SIZE..].iter().all(|&b| b == 0x00));
        assert_views_agree(&flash);
    }

    #[test]
    fn test_erase_is_idempotent() {
        let (_file, mut flash) = device(0xA5);
        flash.erase(0, NV_PAGE_SIZE).unwrap();
        let first = flash.as_slice().to_vec();
        flash.erase(0, NV_PAGE_SIZE).unwrap();
        assert_eq!(flash.as_slice(), &first[..]);
    }

    #[test]
    fn test_normal_write() {
        let (_file, mut flash) = device(0x00);
        flash.erase(0, DEVICE_SIZE).unwrap();

        let message = b"Normal Write Test   ";
        assert_eq!(message.len(), 20);
        flash.write(0, message, message.len(), 0).unwrap();

        assert_eq!(&flash.as_slice()[..20], message);
        assert_eq!(&flash.readonly_view()[..20], message);
        assert_eq!(flash.readonly_view()[20], 0xFF);
    }

    #[test]
    fn test_one_way_bit_transition() {
        let (_file, mut flash) = device(0x00);
        flash.erase(0, DEVICE_SIZE).unwrap();

        flash.program(0, b"abcd").unwrap();
        assert_eq!(&flash.readonly_view()[..4], b"abcd");

        flash.program(0, b"ABCD").unwrap();
        assert_eq!(&flash.readonly_view()[..4], b"ABCD");

        // Bit 5 was cleared and cannot come back without an erase.
        flash.program(0, b"abcd").unwrap();
        assert_eq!(&flash.readonly_view()[..4], b"ABCD");

        flash.erase(0, NV_PAGE_SIZE).unwrap();
        flash.program(0, b"abcd").unwrap();
        assert_eq!(&flash.readonly_view()[..4], b"abcd");
    }

    #[test]
    fn test_write_only_clears_bits() {
        let (_file, mut flash) = device(0x00);
        flash.erase(0, NV_PAGE_SIZE).unwrap();

        let first: Vec<u8> = (0..64u32).map(|i| (i * 37 + 11) as u8).collect();
        let second: Vec<u8> = (0..64u32).map(|i| (i * 91 + 200) as u8).collect();
        flash.program(0, &first).unwrap();
        let before = flash.as_slice()[..64].to_vec();
        flash.program(0, &second).unwrap();

        for (i, (&old, &now)) in before.iter().zip(&flash.as_slice()[..64]).enumerate() {
            assert_eq!(now & !old, 0, "byte {} raised a bit", i);
            assert_eq!(now, old & second[i]);
        }
        assert_views_agree(&flash);
    }

    #[test]
    fn test_write_with_data_offset() {
        let (_file, mut flash) = device(0xFF);
        let data = *b"skipWORDtail";
        flash.write(8, &data, 4, 4).unwrap();
        assert_eq!(&flash.readonly_view()[8..12], b"WORD");
        assert_eq!(flash.readonly_view()[12], 0xFF);
    }

    #[test]
    fn test_write_rejects_unaligned_arguments() {
        let (_file, mut flash) = device(0xFF);
        let before = flash.as_slice().to_vec();
        let message = b"Normal Write Test    ";
        assert_eq!(message.len(), 21);

        let err = flash.write(0, message, message.len(), 0).unwrap_err();
        assert!(matches!(
            err,
            FlashError::LengthNotAligned {
                length: 21,
                align: 4
            }
        ));

        let err = flash.write(2, message, 4, 0).unwrap_err();
        assert!(matches!(
            err,
            FlashError::OffsetNotAligned {
                param: "mock_offset",
                ..
            }
        ));

        let err = flash.write(0, message, 4, 1).unwrap_err();
        assert!(matches!(
            err,
            FlashError::OffsetNotAligned {
                param: "data_offset",
                ..
            }
        ));

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(flash.as_slice(), &before[..]);
    }

    #[test]
    fn test_write_rejects_out_of_range() {
        let (_file, mut flash) = device(0x00);
        flash.erase(0, DEVICE_SIZE).unwrap();

        // Past the end of the source buffer
        let err = flash.write(0, b"abcd", 8, 0).unwrap_err();
        assert!(matches!(
            err,
            FlashError::OutOfRange {
                target: Bound::Source,
                ..
            }
        ));
        let err = flash.write(0, b"abcdefgh", 8, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        // Past the end of the device
        let err = flash.write(DEVICE_SIZE - 4, b"abcdefgh", 8, 0).unwrap_err();
        assert!(matches!(
            err,
            FlashError::OutOfRange {
                target: Bound::Device,
                ..
            }
        ));
        let err = flash.write(usize::MAX - 3, b"abcd", 4, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        assert!(flash.as_slice().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_erase_rejects_bad_alignment() {
        let (_file, mut flash) = device(0x00);

        let err = flash.erase(0, 100).unwrap_err();
        assert!(matches!(err, FlashError::LengthNotAligned { align: 4096, .. }));

        let err = flash.erase(2, NV_PAGE_SIZE).unwrap_err();
        assert!(matches!(err, FlashError::OffsetNotAligned { align: 4096, .. }));

        // Word-aligned but not page-aligned
        let err = flash.erase(4, NV_PAGE_SIZE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert!(flash.as_slice().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_erase_word_alignment_mode() {
        let file = backing(DEVICE_SIZE, 0x00);
        let config = FlashConfig::default().with_erase_alignment(EraseAlignment::Word);
        let mut flash = FlashDevice::with_config(&file, DEVICE_SIZE, 0, config).unwrap();

        flash.erase(4, NV_PAGE_SIZE).unwrap();
        let data = flash.readonly_view();
        assert_eq!(&data[..4], &[0, 0, 0, 0]);
        assert!(data[4..4 + NV_PAGE_SIZE].iter().all(|&b| b == 0xFF));
        assert_eq!(data[4 + NV_PAGE_SIZE], 0x00);

        let err = flash.erase(2, NV_PAGE_SIZE).unwrap_err();
        assert!(matches!(err, FlashError::OffsetNotAligned { align: 4, .. }));
    }

    #[test]
    fn test_erase_rejects_out_of_range() {
        let (_file, mut flash) = device(0x00);
        let err = flash.erase(DEVICE_SIZE - NV_PAGE_SIZE, 2 * NV_PAGE_SIZE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(flash.as_slice().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_read_bounds() {
        let (_file, mut flash) = device(0x00);
        flash.erase(0, NV_PAGE_SIZE).unwrap();
        flash.program(8, b"ABCD").unwrap();

        let mut buf = [0u8; 4];
        flash.read(8, &mut buf).unwrap();
        assert_eq!(&buf, b"ABCD");

        let mut big = [0u8; 8];
        let err = flash.read(DEVICE_SIZE - 4, &mut big).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_storage_offset_mapping() {
        let mut file = backing(3 * NV_PAGE_SIZE, 0x00);
        let mut flash = FlashDevice::new(&file, NV_PAGE_SIZE, NV_PAGE_SIZE as u64).unwrap();
        assert_eq!(flash.storage_offset(), NV_PAGE_SIZE as u64);
        flash.erase(0, NV_PAGE_SIZE).unwrap();
        flash.program(0, b"PAGE").unwrap();
        flash.flush().unwrap();
        flash.destroy();

        let mut contents = Vec::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_end(&mut contents).unwrap();
        assert!(contents[..NV_PAGE_SIZE].iter().all(|&b| b == 0x00));
        assert_eq!(&contents[NV_PAGE_SIZE..NV_PAGE_SIZE + 4], b"PAGE");
        assert!(contents[NV_PAGE_SIZE + 4..2 * NV_PAGE_SIZE].iter().all(|&b| b == 0xFF));
        assert!(contents[2 * NV_PAGE_SIZE..].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_device_outlives_handle() {
        let file = backing(DEVICE_SIZE, 0x00);
        let mut flash = FlashDevice::new(&file, DEVICE_SIZE, 0).unwrap();
        drop(file);

        flash.erase(0, NV_PAGE_SIZE).unwrap();
        flash.program(0, b"open").unwrap();
        assert_eq!(&flash.readonly_view()[..4], b"open");
    }

    #[test]
    fn test_create_rejects_short_file() {
        let file = backing(NV_PAGE_SIZE, 0x00);
        let err = FlashDevice::new(&file, DEVICE_SIZE, 0).unwrap_err();
        assert!(matches!(
            err,
            FlashError::OutOfRange {
                target: Bound::Storage,
                ..
            }
        ));
    }

    #[test]
    fn test_create_rejects_empty_and_bad_config() {
        let file = backing(DEVICE_SIZE, 0x00);
        let err = FlashDevice::new(&file, 0, 0).unwrap_err();
        assert!(matches!(err, FlashError::EmptyMapping));

        let config = FlashConfig::default().with_page_size(6);
        let err = FlashDevice::with_config(&file, DEVICE_SIZE, 0, config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_create_reports_mapping_error() {
        let file = backing(DEVICE_SIZE, 0x00);
        // Not a multiple of the system page size
        let err = FlashDevice::new(&file, NV_PAGE_SIZE, 3).unwrap_err();
        assert!(matches!(
            err,
            FlashError::Mapping {
                view: View::Writable,
                ..
            }
        ));
        assert_eq!(err.errno(), libc::EINVAL);
    }

    #[test]
    fn test_create_reports_os_error() {
        // Shared mappings need a descriptor opened for reading.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nand.bin");
        std::fs::write(&path, vec![0u8; DEVICE_SIZE]).unwrap();
        let file = File::options().write(true).open(&path).unwrap();

        let err = FlashDevice::new(&file, DEVICE_SIZE, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mapping);
        assert_eq!(err.errno(), libc::EACCES);
    }

    /// Mappings of `path` currently listed for this process
    #[cfg(target_os = "linux")]
    fn mapped_regions(path: &std::path::Path) -> usize {
        let maps = std::fs::read_to_string("/proc/self/maps").unwrap();
        let path = path.to_str().unwrap();
        maps.lines().filter(|line| line.ends_with(path)).count()
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_failed_readonly_view_unmaps_writable() {
        use std::os::fd::AsFd;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nand.bin");
        std::fs::write(&path, vec![0u8; DEVICE_SIZE]).unwrap();
        let file = File::options().read(true).write(true).open(&path).unwrap();
        assert_eq!(mapped_regions(&path), 0);

        let (writable, readonly) =
            map_views(file.as_fd(), DEVICE_SIZE, 0, Protection::READ, None).unwrap();
        assert_eq!(mapped_regions(&path), 2);
        drop((writable, readonly));
        assert_eq!(mapped_regions(&path), 0);

        // The writable view maps fine; the read-only one is refused.
        let err = map_views(file.as_fd(), DEVICE_SIZE, 0, Protection::WRITE, None).unwrap_err();
        assert!(matches!(
            err,
            FlashError::Mapping {
                view: View::ReadOnly,
                ..
            }
        ));
        assert_eq!(err.errno(), libc::EINVAL);
        assert_eq!(mapped_regions(&path), 0);

        let flash = FlashDevice::new(&file, DEVICE_SIZE, 0).unwrap();
        assert_eq!(mapped_regions(&path), 2);
        flash.destroy();
        assert_eq!(mapped_regions(&path), 0);
    }

    #[test]
    fn test_writable_view_is_read_write() {
        let (_file, mut flash) = device(0x00);
        assert_eq!(
            flash.writable.protection(),
            Protection::READ | Protection::WRITE
        );
        assert_eq!(flash.readonly.protection(), Protection::READ);
        assert_eq!(flash.writable_mut().len(), DEVICE_SIZE);
    }

    #[test]
    fn test_readonly_exec_view() {
        // Executable file mappings are refused on noexec mounts.
        let file = backing(DEVICE_SIZE, 0x00);
        let config = FlashConfig::default()
            .with_readonly_exec(true)
            .with_readonly_hint(None);
        match FlashDevice::with_config(&file, DEVICE_SIZE, 0, config) {
            Ok(mut flash) => {
                flash.erase(0, NV_PAGE_SIZE).unwrap();
                assert_eq!(flash.readonly_view()[0], 0xFF);
                assert!(!flash.readonly_at_hint());
            }
            Err(err) => assert!(matches!(
                err,
                FlashError::Mapping {
                    view: View::ReadOnly,
                    ..
                }
            )),
        }
    }

    #[test]
    fn test_readonly_hint() {
        let file = backing(DEVICE_SIZE, 0x00);
        let flash = FlashDevice::new(&file, DEVICE_SIZE, 0).unwrap();
        // The hint may or may not be honored; both views stay usable.
        assert_eq!(
            flash.readonly_at_hint(),
            flash.readonly_ptr() as usize == crate::BLOCK_STORE_ADDRESS
        );
        assert_eq!(flash.len(), DEVICE_SIZE);
        assert_views_agree(&flash);
    }
}
