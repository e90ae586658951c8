//! Write-protection probe for the read-only view
//!
//! A store through the read-only view must be stopped by the MMU. Checking
//! that in-process would kill the test runner, so the probe forks: the child
//! writes one byte through the read-only view and the parent inspects how it
//! died.
//!
//! The child stores back the value it just read, so a broken protection
//! does not corrupt the backing file.

use crate::device::FlashDevice;
use crate::error::Result;

/// Outcome of [`probe_readonly_write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultProbe {
    /// The child was killed by the given signal (SIGSEGV or SIGBUS)
    Faulted(i32),
    /// The write went through: the view is not protected
    WriteSucceeded,
    /// The child ended some other way; raw wait status
    Inconclusive(i32),
}

impl FaultProbe {
    /// Whether the read-only view rejected the write
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }
}

/// Try to write through the read-only view of `device` in a child process
#[cfg(unix)]
pub fn probe_readonly_write(device: &FlashDevice) -> Result<FaultProbe> {
    use std::io;

    let target = device.readonly_ptr() as *mut u8;

    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(io::Error::last_os_error().into());
    }
    if pid == 0 {
        // Child: only async-signal-safe calls from here on.
        unsafe {
            let no_core = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            libc::setrlimit(libc::RLIMIT_CORE, &no_core);
            let value = core::ptr::read_volatile(target);
            core::ptr::write_volatile(target, value);
            libc::_exit(0);
        }
    }

    let mut status: libc::c_int = 0;
    loop {
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err.into());
        }
    }

    let outcome = if libc::WIFSIGNALED(status) {
        match libc::WTERMSIG(status) {
            sig @ (libc::SIGSEGV | libc::SIGBUS) => FaultProbe::Faulted(sig),
            _ => FaultProbe::Inconclusive(status),
        }
    } else if libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0 {
        FaultProbe::WriteSucceeded
    } else {
        FaultProbe::Inconclusive(status)
    };

    log::debug!(
        "read-only write probe at {:p}: {:?}",
        device.readonly_ptr(),
        outcome
    );
    Ok(outcome)
}

#[cfg(not(unix))]
pub fn probe_readonly_write(_device: &FlashDevice) -> Result<FaultProbe> {
    Err(crate::error::FlashError::NotSupported(
        "write-protection probe requires fork()",
    ))
}
