//! File-backed stream capability contract.

use std::path::Path;

use super::{HandleProxy, StreamProxy};
use crate::{FsError, SecurityDescriptor};

/// A [`StreamProxy`] bound to a file on disk.
///
/// Adds the file name, a non-owning handle view, the file's security
/// descriptor, and advisory byte-range locking.
///
/// `copy_to` on a file stream only accepts arguments that are themselves
/// backed by a file.
///
/// # Example
///
/// ```rust,no_run
/// use fsproxy::{FileStreamProxy, FsError};
///
/// fn patch_header(stream: &mut dyn FileStreamProxy, header: &[u8]) -> Result<(), FsError> {
///     stream.lock(0, header.len() as u64)?;
///     let written = stream.write(header, 0, header.len());
///     stream.unlock(0, header.len() as u64)?;
///     written
/// }
/// ```
pub trait FileStreamProxy: StreamProxy {
    /// Path the stream was opened on.
    fn name(&self) -> &Path;

    /// Whether the stream was opened for asynchronous use.
    fn is_async(&self) -> bool;

    /// A view of the stream's OS handle.
    ///
    /// The view borrows the stream: closing it does not close the file.
    ///
    /// # Errors
    ///
    /// - [`FsError::Disposed`] if the stream is disposed
    fn safe_handle(&self) -> Result<Box<dyn HandleProxy + '_>, FsError>;

    /// Read the file's security descriptor.
    fn get_access_control(&self) -> Result<SecurityDescriptor, FsError>;

    /// Apply a security descriptor to the file.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if the descriptor was built for a directory
    /// - [`FsError::PermissionDenied`] if the OS refuses the change
    fn set_access_control(&mut self, descriptor: &SecurityDescriptor) -> Result<(), FsError>;

    /// Take an advisory lock on `length` bytes starting at `position`.
    ///
    /// # Errors
    ///
    /// - [`FsError::LockViolation`] if the range overlaps a lock held by this
    ///   stream or by another open of the file
    /// - [`FsError::InvalidOperation`] if `length` is zero
    fn lock(&mut self, position: u64, length: u64) -> Result<(), FsError>;

    /// Release a lock previously taken with exactly this range.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotLocked`] if this stream holds no lock on exactly this range
    /// - [`FsError::InvalidOperation`] if `length` is zero
    fn unlock(&mut self, position: u64, length: u64) -> Result<(), FsError>;
}
