//! Directory metadata and creation contract.

use std::path::Path;

use crate::{FsError, SecurityDescriptor};

/// Metadata and operations for one directory path.
///
/// [`parent`](DirectoryInfoProxy::parent) and
/// [`root`](DirectoryInfoProxy::root) build a new proxy on every call.
pub trait DirectoryInfoProxy {
    /// Whether a directory exists at the path.
    fn exists(&self) -> bool;

    /// Absolute path of the directory.
    fn full_name(&self) -> &Path;

    /// Final component of the path; the full path for a root.
    fn name(&self) -> String;

    /// The containing directory, or `None` at a root.
    fn parent(&self) -> Option<Box<dyn DirectoryInfoProxy>>;

    /// The root of the path.
    fn root(&self) -> Box<dyn DirectoryInfoProxy>;

    /// Create the directory and every missing ancestor.
    ///
    /// Succeeds without change if the directory already exists.
    fn create(&self) -> Result<(), FsError>;

    /// Create the directory, then apply `descriptor` to it.
    ///
    /// Succeeds if the directory already exists; the descriptor is applied
    /// either way.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if the descriptor was built for a file
    fn create_with_security(&self, descriptor: &SecurityDescriptor) -> Result<(), FsError>;
}
