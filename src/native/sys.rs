//! Advisory locking primitives.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

// Open-file-description locks belong to the open file rather than the
// process, so two streams in one process contend like two processes do.
#[cfg(target_os = "linux")]
const SET_RANGE_LOCK: libc::c_int = libc::F_OFD_SETLK;
#[cfg(not(target_os = "linux"))]
const SET_RANGE_LOCK: libc::c_int = libc::F_SETLK;

/// Kind of byte-range lock to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeLock {
    Read,
    Write,
    Unlock,
}

/// Take a whole-file share lock without blocking.
pub(crate) fn try_share_lock(fd: BorrowedFd<'_>, exclusive: bool) -> io::Result<()> {
    let operation = if exclusive {
        libc::LOCK_EX
    } else {
        libc::LOCK_SH
    };
    // SAFETY: `fd` is open for the duration of the borrow.
    let rc = unsafe { libc::flock(fd.as_raw_fd(), operation | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Place or remove a byte-range lock without blocking.
pub(crate) fn set_range_lock(
    fd: BorrowedFd<'_>,
    kind: RangeLock,
    position: u64,
    length: u64,
) -> io::Result<()> {
    let start = libc::off_t::try_from(position)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "lock position too large"))?;
    let len = libc::off_t::try_from(length)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "lock length too large"))?;

    // SAFETY: `flock` is plain old data; all-zero is a valid value and
    // leaves `l_pid` at 0 as OFD locks require.
    let mut request: libc::flock = unsafe { std::mem::zeroed() };
    request.l_type = match kind {
        RangeLock::Read => libc::F_RDLCK,
        RangeLock::Write => libc::F_WRLCK,
        RangeLock::Unlock => libc::F_UNLCK,
    } as libc::c_short;
    request.l_whence = libc::SEEK_SET as libc::c_short;
    request.l_start = start;
    request.l_len = len;

    // SAFETY: `fd` is open for the duration of the borrow and `request`
    // outlives the call.
    let rc = unsafe { libc::fcntl(fd.as_raw_fd(), SET_RANGE_LOCK, &raw const request) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Whether a lock call failed because someone else holds the lock.
pub(crate) fn is_contended(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::WouldBlock
        || matches!(error.raw_os_error(), Some(libc::EACCES) | Some(libc::EAGAIN))
}
