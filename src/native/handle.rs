//! Owning and borrowed OS file handles.

use std::mem;
use std::os::fd::{AsRawFd, BorrowedFd, IntoRawFd, OwnedFd, RawFd};

use crate::{Dispose, FsError, HandleProxy};

enum Descriptor<'fd> {
    Owned(OwnedFd),
    Borrowed(BorrowedFd<'fd>),
    Released,
}

/// An OS file descriptor with explicit, reference-counted release.
///
/// Built either [`owning`](SafeFileHandle::owning) a descriptor, which it
/// closes exactly once, or [`borrowing`](SafeFileHandle::borrowing) one, in
/// which case closing only detaches the view and the owner keeps the file
/// open.
///
/// # Example
///
/// ```rust,no_run
/// use fsproxy::{HandleProxy, SafeFileHandle};
/// use std::os::fd::OwnedFd;
///
/// let file = std::fs::File::open("/etc/hostname")?;
/// let mut handle = SafeFileHandle::owning(OwnedFd::from(file));
/// handle.dangerous_add_ref()?;
/// handle.close(); // deferred: still pinned
/// assert!(handle.is_closed());
/// handle.dangerous_release()?; // descriptor released here
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SafeFileHandle<'fd> {
    descriptor: Descriptor<'fd>,
    raw: RawFd,
    closed: bool,
    invalid: bool,
    refs: usize,
}

impl SafeFileHandle<'static> {
    /// Take ownership of `fd`.
    pub fn owning(fd: OwnedFd) -> Self {
        let raw = fd.as_raw_fd();
        Self {
            descriptor: Descriptor::Owned(fd),
            raw,
            closed: false,
            invalid: false,
            refs: 0,
        }
    }
}

impl<'fd> SafeFileHandle<'fd> {
    /// A non-owning view of `fd`.
    pub fn borrowing(fd: BorrowedFd<'fd>) -> Self {
        Self {
            descriptor: Descriptor::Borrowed(fd),
            raw: fd.as_raw_fd(),
            closed: false,
            invalid: false,
            refs: 0,
        }
    }

    /// Whether this handle releases the descriptor when closed.
    pub fn owns_handle(&self) -> bool {
        matches!(self.descriptor, Descriptor::Owned(_))
    }

    fn release_descriptor(&mut self) {
        if let Descriptor::Owned(fd) = mem::replace(&mut self.descriptor, Descriptor::Released) {
            tracing::debug!(fd = self.raw, "releasing file handle");
            drop(fd);
        }
    }
}

impl HandleProxy for SafeFileHandle<'_> {
    fn is_invalid(&self) -> bool {
        self.invalid || self.raw < 0
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.refs == 0 {
            self.release_descriptor();
        }
    }

    fn dangerous_add_ref(&mut self) -> Result<(), FsError> {
        if self.closed || self.is_invalid() {
            return Err(FsError::InvalidHandle {
                reason: "handle is closed",
            });
        }
        self.refs += 1;
        Ok(())
    }

    fn dangerous_release(&mut self) -> Result<(), FsError> {
        if self.refs == 0 {
            return Err(FsError::InvalidHandle {
                reason: "release without a matching add_ref",
            });
        }
        self.refs -= 1;
        if self.refs == 0 && self.closed {
            self.release_descriptor();
        }
        Ok(())
    }

    fn dangerous_get_handle(&self) -> RawFd {
        self.raw
    }

    fn set_handle_as_invalid(&mut self) {
        self.invalid = true;
        self.closed = true;
        if let Descriptor::Owned(fd) = mem::replace(&mut self.descriptor, Descriptor::Released) {
            // Ownership moved elsewhere: forget the descriptor without closing it.
            let _ = fd.into_raw_fd();
        }
    }
}

impl Dispose for SafeFileHandle<'_> {
    fn dispose(&mut self) {
        HandleProxy::close(self);
    }

    fn is_disposed(&self) -> bool {
        self.closed
    }
}

impl std::fmt::Debug for SafeFileHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeFileHandle")
            .field("fd", &self.raw)
            .field("owns_handle", &self.owns_handle())
            .field("closed", &self.closed)
            .field("invalid", &self.invalid)
            .field("refs", &self.refs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::AsFd;

    fn owned() -> SafeFileHandle<'static> {
        let file = tempfile::tempfile().unwrap();
        SafeFileHandle::owning(OwnedFd::from(file))
    }

    #[test]
    fn owning_handle_is_valid_and_open() {
        let handle = owned();
        assert!(handle.owns_handle());
        assert!(!handle.is_invalid());
        assert!(!handle.is_closed());
        assert!(handle.dangerous_get_handle() >= 0);
    }

    #[test]
    fn close_is_idempotent() {
        let mut handle = owned();
        handle.close();
        handle.close();
        assert!(handle.is_closed());
        assert!(handle.is_disposed());
        assert!(!handle.owns_handle());
    }

    #[test]
    fn close_while_pinned_defers_release() {
        let mut handle = owned();
        handle.dangerous_add_ref().unwrap();
        handle.close();
        assert!(handle.is_closed());
        assert!(handle.owns_handle(), "descriptor kept while pinned");
        handle.dangerous_release().unwrap();
        assert!(!handle.owns_handle());
    }

    #[test]
    fn add_ref_on_closed_handle_fails() {
        let mut handle = owned();
        handle.close();
        assert!(matches!(
            handle.dangerous_add_ref(),
            Err(FsError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn unbalanced_release_fails() {
        let mut handle = owned();
        assert!(matches!(
            handle.dangerous_release(),
            Err(FsError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn set_handle_as_invalid_relinquishes_without_closing() {
        let file = tempfile::tempfile().unwrap();
        let raw = file.as_raw_fd();
        let mut handle = SafeFileHandle::owning(OwnedFd::from(file));
        handle.set_handle_as_invalid();
        assert!(handle.is_invalid());
        assert!(handle.is_closed());
        // SAFETY: the handle gave up the descriptor without closing it; we
        // take it back here so the test does not leak.
        let reclaimed = unsafe { <OwnedFd as std::os::fd::FromRawFd>::from_raw_fd(raw) };
        drop(reclaimed);
    }

    #[test]
    fn borrowed_view_never_closes_owner() {
        let file = tempfile::tempfile().unwrap();
        {
            let mut view = SafeFileHandle::borrowing(file.as_fd());
            assert!(!view.owns_handle());
            view.close();
            assert!(view.is_closed());
        }
        // The owner still has a live descriptor.
        assert!(file.metadata().is_ok());
    }
}
