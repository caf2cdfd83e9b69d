//! Writing named files into a directory that must be validated first.

use std::path::{Component, Path};

use crate::{
    DirectoryInfoProxy, FileEntry, FileInfoProxy, FsError, StreamProxy, TextWriterProxy,
};

/// Writes named files into one directory.
///
/// Writes are refused with [`FsError::InvalidOperation`] until
/// [`validate`](DirectoryWriter::validate) has seen the directory exist.
/// The directory is only checked when `validate` is called; deleting it
/// afterwards surfaces as an I/O error from the write itself.
///
/// # Example
///
/// ```rust,no_run
/// use fsproxy::{DirectoryEntry, DirectoryInfoProxy, DirectoryWriter};
///
/// let target = DirectoryEntry::new("/var/spool/reports")?;
/// target.create()?;
///
/// let mut writer = DirectoryWriter::new(target);
/// assert!(writer.validate());
/// writer.write_file("summary.txt", "all good\n")?;
/// # Ok::<(), fsproxy::FsError>(())
/// ```
#[derive(Debug)]
pub struct DirectoryWriter<D> {
    directory: D,
    validated: bool,
}

impl<D: DirectoryInfoProxy> DirectoryWriter<D> {
    /// An unvalidated writer targeting `directory`.
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            validated: false,
        }
    }

    /// Check that the directory exists. Returns the new validation state.
    pub fn validate(&mut self) -> bool {
        self.validated = self.directory.exists();
        self.validated
    }

    /// Whether the last [`validate`](DirectoryWriter::validate) succeeded.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// The target directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Create or truncate `name` in the directory and write `contents`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidOperation`] if the directory was not validated or
    ///   `name` is not a plain file name
    pub fn write_file(&self, name: &str, contents: &str) -> Result<(), FsError> {
        let file = self.entry("write_file", name)?;
        let mut writer = file.create_text()?;
        writer.write_str(contents)?;
        writer.close()?;
        tracing::debug!(path = %file.full_name().display(), bytes = contents.len(), "wrote file");
        Ok(())
    }

    /// Create or truncate `name` in the directory and copy the rest of
    /// `contents` into it. Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidOperation`] if the directory was not validated or
    ///   `name` is not a plain file name
    /// - [`FsError::InvalidArgument`] if `contents` is not file-backed
    pub fn write_stream(&self, name: &str, contents: &mut dyn StreamProxy) -> Result<u64, FsError> {
        let file = self.entry("write_stream", name)?;
        let mut target = file.create()?;
        let copied = contents.copy_to(target.as_mut())?;
        target.close()?;
        tracing::debug!(path = %file.full_name().display(), bytes = copied, "wrote file");
        Ok(copied)
    }

    fn entry(&self, operation: &'static str, name: &str) -> Result<FileEntry, FsError> {
        if !self.validated {
            return Err(FsError::InvalidOperation {
                operation,
                reason: format!(
                    "directory {} has not been validated or does not exist",
                    self.directory.full_name().display()
                ),
            });
        }
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(FileEntry::representing(
                self.directory.full_name().join(name),
            )),
            _ => Err(FsError::InvalidOperation {
                operation,
                reason: format!("{name:?} is not a plain file name"),
            }),
        }
    }
}
