//! File-backed stream adapter.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::os::fd::AsFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::stream::copy_native;
use super::sys::{self, RangeLock};
use crate::types::ByteRange;
use crate::{
    AccessSections, DescriptorKind, Dispose, FileAccess, FileMode, FileOpenOptions, FileShare,
    FileStreamProxy, FsError, HandleProxy, SafeFileHandle, SecurityDescriptor, SeekOrigin, Stream,
    StreamClient, StreamProxy,
};

/// [`FileStreamProxy`] over one owned open file.
///
/// Opening through [`FileStream::open`] also takes a cooperative share lock
/// matching [`FileShare`]: exclusive for `FileShare::None`, shared otherwise.
/// The lock lives as long as the descriptor.
///
/// Byte-range locks taken with [`lock`](FileStreamProxy::lock) are tracked
/// per stream and dropped with the descriptor on dispose.
pub struct FileStream {
    stream: Stream,
    path: PathBuf,
    is_async: bool,
    locks: Vec<ByteRange>,
}

impl FileStream {
    /// Open `path` as described by `options`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file is missing and the mode does not create it
    /// - [`FsError::AlreadyExists`] for [`FileMode::CreateNew`] on an existing file
    /// - [`FsError::SharingViolation`] if another open holds an incompatible share lock
    pub fn open(path: impl AsRef<Path>, options: FileOpenOptions) -> Result<Self, FsError> {
        let path = path.as_ref();
        let access = options.effective_access();

        let mut open = OpenOptions::new();
        open.read(access.can_read()).write(access.can_write());
        match options.mode {
            FileMode::CreateNew => open.create_new(true),
            FileMode::Create => open.create(true),
            FileMode::Open | FileMode::Truncate => &mut open,
            FileMode::OpenOrCreate => open.create(true),
            FileMode::Append => open.append(true).create(true),
        };
        let mut file = open.open(path).map_err(|e| FsError::io("open", path, e))?;

        sys::try_share_lock(file.as_fd(), options.share == FileShare::None).map_err(|e| {
            if sys::is_contended(&e) {
                FsError::SharingViolation {
                    path: path.to_path_buf(),
                }
            } else {
                FsError::io("open", path, e)
            }
        })?;

        // Truncate only once the share lock is held.
        match options.mode {
            FileMode::Create | FileMode::Truncate => {
                file.set_len(0).map_err(|e| FsError::io("open", path, e))?;
            }
            FileMode::Append => {
                file.seek(SeekFrom::End(0))
                    .map_err(|e| FsError::io("open", path, e))?;
            }
            _ => {}
        }

        tracing::debug!(path = %path.display(), ?options, "opened file stream");
        let mut stream = Self::representing(file, path, access);
        stream.is_async = options.asynchronous;
        Ok(stream)
    }

    /// Wrap a file that is already open, taking ownership of it.
    ///
    /// `path` is reported by [`name`](FileStreamProxy::name); `access` must
    /// describe how the file was opened.
    pub fn representing(file: File, path: impl Into<PathBuf>, access: FileAccess) -> Self {
        Self {
            stream: Stream::from_file(file, access).named("FileStream"),
            path: path.into(),
            is_async: false,
            locks: Vec::new(),
        }
    }

    /// Give up the file-stream view and keep the plain byte stream.
    ///
    /// Byte-range locks held by this stream stay with the descriptor.
    pub fn into_stream(self) -> Stream {
        self.stream.named("Stream")
    }

    fn file(&self) -> Result<&File, FsError> {
        self.stream
            .file()
            .ok_or(FsError::Disposed {
                proxy: "FileStream",
            })
    }
}

impl Dispose for FileStream {
    fn dispose(&mut self) {
        self.locks.clear();
        self.stream.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.stream.is_disposed()
    }
}

impl std::fmt::Debug for FileStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStream")
            .field("path", &self.path)
            .field("is_async", &self.is_async)
            .field("locks", &self.locks)
            .field("disposed", &self.stream.is_disposed())
            .finish()
    }
}

impl StreamProxy for FileStream {
    fn proxy_name(&self) -> &'static str {
        "FileStream"
    }

    fn can_read(&self) -> bool {
        self.stream.can_read()
    }

    fn can_write(&self) -> bool {
        self.stream.can_write()
    }

    fn can_seek(&self) -> bool {
        self.stream.can_seek()
    }

    fn can_timeout(&self) -> bool {
        self.stream.can_timeout()
    }

    fn length(&self) -> Result<u64, FsError> {
        self.stream.length()
    }

    fn position(&self) -> Result<u64, FsError> {
        self.stream.position()
    }

    fn read_timeout(&self) -> Result<Duration, FsError> {
        self.stream.read_timeout()
    }

    fn write_timeout(&self) -> Result<Duration, FsError> {
        self.stream.write_timeout()
    }

    fn flush(&mut self) -> Result<(), FsError> {
        self.stream.flush()
    }

    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize, FsError> {
        self.stream.read(buffer, offset, count)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<(), FsError> {
        self.stream.write(buffer, offset, count)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, FsError> {
        self.stream.seek(offset, origin)
    }

    fn close(&mut self) -> Result<(), FsError> {
        self.locks.clear();
        self.stream.close()
    }

    fn copy_to(&mut self, other: &mut dyn StreamProxy) -> Result<u64, FsError> {
        let readable = self.stream.can_read();
        copy_native("FileStream", readable, self.stream.client_mut(), other)
    }

    fn client_mut(&mut self) -> Option<StreamClient<'_>> {
        self.stream.client_mut()
    }
}

impl FileStreamProxy for FileStream {
    fn name(&self) -> &Path {
        &self.path
    }

    fn is_async(&self) -> bool {
        self.is_async
    }

    fn safe_handle(&self) -> Result<Box<dyn HandleProxy + '_>, FsError> {
        let file = self.file()?;
        Ok(Box::new(SafeFileHandle::borrowing(file.as_fd())))
    }

    fn get_access_control(&self) -> Result<SecurityDescriptor, FsError> {
        let metadata = self
            .file()?
            .metadata()
            .map_err(|e| FsError::io("get_access_control", &self.path, e))?;
        Ok(SecurityDescriptor::representing(
            DescriptorKind::File,
            &metadata,
            AccessSections::ALL,
        ))
    }

    fn set_access_control(&mut self, descriptor: &SecurityDescriptor) -> Result<(), FsError> {
        descriptor.require(
            DescriptorKind::File,
            "set_access_control",
            "FileStream",
            "FileStreamProxy",
        )?;
        descriptor
            .apply_to_file(self.file()?)
            .map_err(|e| FsError::io("set_access_control", &self.path, e))
    }

    fn lock(&mut self, position: u64, length: u64) -> Result<(), FsError> {
        let range = ByteRange { position, length };
        let file = self.file()?;
        reject_empty("lock", range)?;
        if self.locks.iter().any(|held| held.overlaps(&range)) {
            return Err(FsError::LockViolation { position, length });
        }
        let kind = if self.stream.can_write() {
            RangeLock::Write
        } else {
            RangeLock::Read
        };
        sys::set_range_lock(file.as_fd(), kind, position, length).map_err(|e| {
            if sys::is_contended(&e) {
                FsError::LockViolation { position, length }
            } else {
                FsError::io("lock", &self.path, e)
            }
        })?;
        self.locks.push(range);
        Ok(())
    }

    fn unlock(&mut self, position: u64, length: u64) -> Result<(), FsError> {
        let range = ByteRange { position, length };
        let file = self.file()?;
        reject_empty("unlock", range)?;
        let Some(index) = self.locks.iter().position(|held| *held == range) else {
            return Err(FsError::NotLocked { position, length });
        };
        sys::set_range_lock(file.as_fd(), RangeLock::Unlock, position, length)
            .map_err(|e| FsError::io("unlock", &self.path, e))?;
        self.locks.swap_remove(index);
        Ok(())
    }
}

/// A zero `l_len` means "through end of file" to `fcntl`.
fn reject_empty(operation: &'static str, range: ByteRange) -> Result<(), FsError> {
    if range.length == 0 {
        return Err(FsError::InvalidOperation {
            operation,
            reason: format!("empty byte range at position {}", range.position),
        });
    }
    Ok(())
}
