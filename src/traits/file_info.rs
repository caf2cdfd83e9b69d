//! Single-file metadata and factory contract.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{DirectoryInfoProxy, FileStreamProxy, TextWriterProxy};
use crate::{FileOpenOptions, FsError, Permissions};

/// Metadata and operations for one file path.
///
/// Also the factory for file streams and text writers bound to the path.
/// All factory operations fail with whatever the OS reports (not found,
/// access denied, sharing violation); the proxy adds no validation.
///
/// # Example
///
/// ```rust,no_run
/// use fsproxy::{FileEntry, FileInfoProxy, FsError};
///
/// fn log_line(file: &dyn FileInfoProxy, line: &str) -> Result<(), FsError> {
///     let mut writer = file.append_text()?;
///     writer.write_line_str(line)?;
///     writer.close()
/// }
///
/// let file = FileEntry::new("/tmp/app.log")?;
/// log_line(&file, "started")?;
/// # Ok::<(), FsError>(())
/// ```
pub trait FileInfoProxy {
    /// Whether a regular file exists at the path.
    fn exists(&self) -> bool;

    /// Whether the file denies writing.
    fn is_read_only(&self) -> Result<bool, FsError>;

    /// Final component of the path.
    fn name(&self) -> String;

    /// Path of the containing directory.
    fn directory_name(&self) -> Option<PathBuf>;

    /// Absolute path of the file.
    fn full_name(&self) -> &Path;

    /// When the file was created.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    /// - [`FsError::Io`] if the platform does not record birth times
    fn creation_time(&self) -> Result<SystemTime, FsError>;

    /// Extension of the file name, without the dot.
    fn extension(&self) -> Option<String>;

    /// Permission bits of the file.
    fn attributes(&self) -> Result<Permissions, FsError>;

    /// Replace the permission bits of the file.
    fn set_attributes(&self, attributes: Permissions) -> Result<(), FsError>;

    /// Create or truncate the file and open it for reading and writing.
    fn create(&self) -> Result<Box<dyn FileStreamProxy>, FsError>;

    /// Open a text writer on an empty file.
    ///
    /// An existing file is truncated and reopened for reading and writing,
    /// so the writer's base stream can read back what it wrote. A missing
    /// file is created write-only.
    fn create_text(&self) -> Result<Box<dyn TextWriterProxy>, FsError>;

    /// Open a text writer appending to the file, creating it if missing.
    fn append_text(&self) -> Result<Box<dyn TextWriterProxy>, FsError>;

    /// Open the file with explicit mode, access and sharing.
    fn open(&self, options: FileOpenOptions) -> Result<Box<dyn FileStreamProxy>, FsError>;

    /// Copy the file to `destination`.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `destination` exists and `overwrite` is `false`
    /// - [`FsError::NotFound`] if this file does not exist
    /// - [`FsError::InvalidOperation`] if `destination` is this same file
    ///
    /// A failed copy to a fresh destination leaves no file behind.
    fn copy_to(&self, destination: &Path, overwrite: bool) -> Result<(), FsError>;

    /// A new view of the containing directory.
    fn directory(&self) -> Option<Box<dyn DirectoryInfoProxy>>;
}
