//! Shared file mappings
//!
//! A [`Mapping`] owns one `MAP_SHARED` region of a file and unmaps it when
//! dropped. Two mappings of the same file range alias the same page cache
//! pages, which is what lets the read-only view of a
//! [`FlashDevice`](crate::FlashDevice) observe writes made through the
//! read/write view.
//!
//! # Safety
//!
//! The slices handed out by a mapping assume that nobody else truncates or
//! rewrites the backing file while it is mapped. This is the usual caveat
//! for file mappings and is the caller's responsibility.

use bitflags::bitflags;
use std::io;
#[cfg(unix)]
use std::os::fd::{AsRawFd, BorrowedFd};
use std::ptr::NonNull;

bitflags! {
    /// Access permissions of a mapping
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u32 {
        /// Pages may be read
        const READ  = 1 << 0;
        /// Pages may be written
        const WRITE = 1 << 1;
        /// Pages may be executed
        const EXEC  = 1 << 2;
    }
}

#[cfg(unix)]
impl Protection {
    fn to_prot(self) -> libc::c_int {
        let mut prot = libc::PROT_NONE;
        if self.contains(Self::READ) {
            prot |= libc::PROT_READ;
        }
        if self.contains(Self::WRITE) {
            prot |= libc::PROT_WRITE;
        }
        if self.contains(Self::EXEC) {
            prot |= libc::PROT_EXEC;
        }
        prot
    }
}

/// One shared mapping of a file range
#[derive(Debug)]
pub struct Mapping {
    ptr: NonNull<u8>,
    len: usize,
    protection: Protection,
}

#[cfg(unix)]
impl Mapping {
    /// Map `len` bytes of `fd` starting at `offset`
    ///
    /// `hint` is passed to the kernel as the preferred address; it is never
    /// combined with `MAP_FIXED`, so an occupied or refused address results
    /// in the mapping landing elsewhere rather than clobbering anything.
    ///
    /// # Errors
    ///
    /// - `EINVAL` for a zero length or a protection without [`Protection::READ`]
    /// - `ENXIO` if the range extends past the end of a regular file
    /// - any error reported by `mmap`
    pub fn new(
        fd: BorrowedFd<'_>,
        len: usize,
        offset: u64,
        protection: Protection,
        hint: Option<usize>,
    ) -> io::Result<Self> {
        if len == 0 || !protection.contains(Protection::READ) {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        // Pages past EOF raise SIGBUS on access.
        if let Some(file_len) = regular_file_len(fd)? {
            match offset.checked_add(len as u64) {
                Some(end) if end <= file_len => {}
                _ => return Err(io::Error::from_raw_os_error(libc::ENXIO)),
            }
        }
        let file_offset = libc::off_t::try_from(offset)
            .map_err(|_| io::Error::from_raw_os_error(libc::EOVERFLOW))?;
        let addr = hint.unwrap_or(0) as *mut libc::c_void;

        let ptr = unsafe {
            libc::mmap(
                addr,
                len,
                protection.to_prot(),
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                file_offset,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        let ptr = NonNull::new(ptr as *mut u8)
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EFAULT))?;

        log::debug!(
            "mapped {} bytes at offset {:#x} -> {:p} ({:?})",
            len,
            offset,
            ptr,
            protection
        );

        Ok(Self {
            ptr,
            len,
            protection,
        })
    }

    /// Flush dirty pages back to the file and wait for completion
    pub fn sync(&self) -> io::Result<()> {
        let addr = self.ptr.as_ptr() as *mut libc::c_void;
        let rc = unsafe { libc::msync(addr, self.len, libc::MS_SYNC) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
impl Mapping {
    pub fn new<F>(
        _fd: F,
        _len: usize,
        _offset: u64,
        _protection: Protection,
        _hint: Option<usize>,
    ) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "shared file mappings are only supported on unix",
        ))
    }

    pub fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}

impl Mapping {
    /// Start address of the mapping
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    /// Whether the kernel placed the mapping at `addr`
    pub fn is_at(&self, addr: usize) -> bool {
        self.ptr.as_ptr() as usize == addr
    }

    /// View the mapped bytes
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `new` only creates READ mappings, and they are backed by
        // the file for all `len` bytes until drop.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Mutable view of the mapped bytes, or `None` for a read-only mapping
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        if !self.protection.contains(Protection::READ | Protection::WRITE) {
            return None;
        }
        // SAFETY: the region is mapped read/write for `len` bytes and
        // `&mut self` guarantees no other slice of this mapping is live.
        Some(unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) })
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            let rc = unsafe { libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len) };
            if rc != 0 {
                log::warn!(
                    "munmap of {:p} ({} bytes) failed: {}",
                    self.ptr,
                    self.len,
                    io::Error::last_os_error()
                );
            } else {
                log::debug!("unmapped {} bytes at {:p}", self.len, self.ptr);
            }
        }
    }
}

// The mapping is plain memory owned by this value; mutation needs `&mut`.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

/// Size of `fd` if it refers to a regular file
///
/// Devices, shared memory objects and the like report `None`; their size is
/// not a reliable bound for mapping.
#[cfg(unix)]
pub(crate) fn regular_file_len(fd: BorrowedFd<'_>) -> io::Result<Option<u64>> {
    let mut st = std::mem::MaybeUninit::<libc::stat>::uninit();
    let rc = unsafe { libc::fstat(fd.as_raw_fd(), st.as_mut_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: fstat succeeded and filled the struct.
    let st = unsafe { st.assume_init() };
    if st.st_mode & libc::S_IFMT == libc::S_IFREG {
        Ok(Some(st.st_size as u64))
    } else {
        Ok(None)
    }
}
