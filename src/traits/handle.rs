//! Low-level OS handle capability contract.

use std::os::fd::RawFd;

use crate::FsError;

/// An OS file handle with explicit, reference-counted release.
///
/// # Reference counting
///
/// [`dangerous_add_ref`](HandleProxy::dangerous_add_ref) pins the handle
/// across a call that uses the raw descriptor. While pinned, `close` only
/// marks the handle closed; the descriptor is released by the final
/// [`dangerous_release`](HandleProxy::dangerous_release). Callers must
/// balance every add with a release.
pub trait HandleProxy {
    /// Whether the handle value is unusable.
    fn is_invalid(&self) -> bool;

    /// Whether the handle has been closed.
    fn is_closed(&self) -> bool;

    /// Release the handle. Repeated calls do nothing.
    fn close(&mut self);

    /// Pin the handle.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if the handle is closed or invalid
    fn dangerous_add_ref(&mut self) -> Result<(), FsError>;

    /// Unpin the handle, releasing it if it was closed while pinned.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if there is no matching add
    fn dangerous_release(&mut self) -> Result<(), FsError>;

    /// The raw descriptor.
    ///
    /// The value must not be used after the owning handle is released.
    fn dangerous_get_handle(&self) -> RawFd;

    /// Mark the handle unusable without releasing the descriptor.
    ///
    /// For descriptors whose ownership moved elsewhere.
    fn set_handle_as_invalid(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Handle double tracking pins without touching the OS.
    struct CountedHandle {
        refs: usize,
        closed: bool,
        released: bool,
    }

    impl HandleProxy for CountedHandle {
        fn is_invalid(&self) -> bool {
            false
        }
        fn is_closed(&self) -> bool {
            self.closed
        }
        fn close(&mut self) {
            self.closed = true;
            self.released = self.refs == 0;
        }
        fn dangerous_add_ref(&mut self) -> Result<(), FsError> {
            self.refs += 1;
            Ok(())
        }
        fn dangerous_release(&mut self) -> Result<(), FsError> {
            self.refs = self.refs.checked_sub(1).ok_or(FsError::InvalidHandle {
                reason: "unbalanced release",
            })?;
            self.released |= self.closed && self.refs == 0;
            Ok(())
        }
        fn dangerous_get_handle(&self) -> RawFd {
            -1
        }
        fn set_handle_as_invalid(&mut self) {}
    }

    fn pinned_close(handle: &mut dyn HandleProxy) -> Result<(), FsError> {
        handle.dangerous_add_ref()?;
        handle.close();
        handle.dangerous_release()
    }

    #[test]
    fn trait_is_object_safe() {
        let mut handle = CountedHandle {
            refs: 0,
            closed: false,
            released: false,
        };
        pinned_close(&mut handle).unwrap();
        assert!(handle.is_closed());
        assert!(handle.released);
        assert!(handle.dangerous_release().is_err());
    }
}
