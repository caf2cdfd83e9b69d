//! Byte stream adapter over a file or an in-memory buffer, plus the
//! non-owning view handed out by writers.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};
use std::time::Duration;

use crate::{Dispose, FileAccess, FsError, SeekOrigin, StreamClient, StreamProxy};

enum Native {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

/// [`StreamProxy`] over one owned native stream.
///
/// The native stream is either an open [`File`] or a growable in-memory
/// buffer. It is released exactly once, by [`Dispose::dispose`],
/// [`StreamProxy::close`], or drop.
///
/// # Example
///
/// ```rust
/// use fsproxy::{SeekOrigin, Stream, StreamProxy};
///
/// let mut stream = Stream::memory(Vec::new());
/// stream.write(b"hello world", 0, 5).unwrap();
/// stream.seek(0, SeekOrigin::Begin).unwrap();
///
/// let mut buf = [0u8; 8];
/// let n = stream.read(&mut buf, 0, 8).unwrap();
/// assert_eq!(&buf[..n], b"hello");
/// ```
pub struct Stream {
    native: Option<Native>,
    access: FileAccess,
    seekable: bool,
    proxy: &'static str,
}

impl Stream {
    /// A read-write stream over `data`, positioned at the start.
    pub fn memory(data: Vec<u8>) -> Self {
        Self::over(Native::Memory(Cursor::new(data)), FileAccess::ReadWrite, true)
    }

    /// A read-only stream over `data`, positioned at the start.
    pub fn memory_read_only(data: Vec<u8>) -> Self {
        Self::over(Native::Memory(Cursor::new(data)), FileAccess::Read, true)
    }

    /// Wrap an already-open file, taking ownership of it.
    ///
    /// `access` must describe how the file was opened; it drives the
    /// capability flags.
    pub fn from_file(file: File, access: FileAccess) -> Self {
        let seekable = (&file).stream_position().is_ok();
        Self::over(Native::File(file), access, seekable)
    }

    fn over(native: Native, access: FileAccess, seekable: bool) -> Self {
        Self {
            native: Some(native),
            access,
            seekable,
            proxy: "Stream",
        }
    }

    pub(crate) fn named(mut self, proxy: &'static str) -> Self {
        self.proxy = proxy;
        self
    }

    pub(crate) fn file(&self) -> Option<&File> {
        match &self.native {
            Some(Native::File(file)) => Some(file),
            _ => None,
        }
    }

    fn native(&self) -> Result<&Native, FsError> {
        self.native.as_ref().ok_or(FsError::Disposed { proxy: self.proxy })
    }

    fn native_mut(&mut self) -> Result<&mut Native, FsError> {
        self.native
            .as_mut()
            .ok_or(FsError::Disposed { proxy: self.proxy })
    }

    fn require(&self, supported: bool, operation: &'static str) -> Result<(), FsError> {
        self.native()?;
        if supported {
            Ok(())
        } else {
            Err(FsError::NotSupported { operation })
        }
    }
}

impl Dispose for Stream {
    fn dispose(&mut self) {
        if let Some(native) = self.native.take() {
            tracing::debug!(proxy = self.proxy, "releasing stream");
            drop(native);
        }
    }

    fn is_disposed(&self) -> bool {
        self.native.is_none()
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.native.as_ref().map(|native| match native {
            Native::File(_) => "file",
            Native::Memory(_) => "memory",
        });
        f.debug_struct(self.proxy)
            .field("kind", &kind)
            .field("access", &self.access)
            .field("seekable", &self.seekable)
            .finish()
    }
}

impl StreamProxy for Stream {
    fn proxy_name(&self) -> &'static str {
        self.proxy
    }

    fn can_read(&self) -> bool {
        self.native.is_some() && self.access.can_read()
    }

    fn can_write(&self) -> bool {
        self.native.is_some() && self.access.can_write()
    }

    fn can_seek(&self) -> bool {
        self.native.is_some() && self.seekable
    }

    fn can_timeout(&self) -> bool {
        false
    }

    fn length(&self) -> Result<u64, FsError> {
        self.require(self.seekable, "length")?;
        match self.native()? {
            Native::File(file) => Ok(file.metadata()?.len()),
            Native::Memory(cursor) => Ok(cursor.get_ref().len() as u64),
        }
    }

    fn position(&self) -> Result<u64, FsError> {
        self.require(self.seekable, "position")?;
        match self.native()? {
            Native::File(file) => Ok((&*file).stream_position()?),
            Native::Memory(cursor) => Ok(cursor.position()),
        }
    }

    fn read_timeout(&self) -> Result<Duration, FsError> {
        self.require(self.can_timeout(), "read_timeout")?;
        Ok(Duration::ZERO)
    }

    fn write_timeout(&self) -> Result<Duration, FsError> {
        self.require(self.can_timeout(), "write_timeout")?;
        Ok(Duration::ZERO)
    }

    fn flush(&mut self) -> Result<(), FsError> {
        match self.native_mut()? {
            Native::File(file) => file.flush()?,
            Native::Memory(_) => {}
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize, FsError> {
        let len = buffer.len();
        let slice = offset
            .checked_add(count)
            .and_then(|end| buffer.get_mut(offset..end))
            .ok_or(FsError::OutOfRange { offset, count, len })?;
        self.require(self.access.can_read(), "read")?;
        let n = match self.native_mut()? {
            Native::File(file) => file.read(slice)?,
            Native::Memory(cursor) => cursor.read(slice)?,
        };
        Ok(n)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<(), FsError> {
        let slice = offset
            .checked_add(count)
            .and_then(|end| buffer.get(offset..end))
            .ok_or(FsError::OutOfRange {
                offset,
                count,
                len: buffer.len(),
            })?;
        self.require(self.access.can_write(), "write")?;
        match self.native_mut()? {
            Native::File(file) => file.write_all(slice)?,
            Native::Memory(cursor) => cursor.write_all(slice)?,
        }
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, FsError> {
        self.require(self.seekable, "seek")?;
        let target = origin.seek_from(offset).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before the beginning of the stream",
            )
        })?;
        let position = match self.native_mut()? {
            Native::File(file) => file.seek(target)?,
            Native::Memory(cursor) => cursor.seek(target)?,
        };
        Ok(position)
    }

    fn close(&mut self) -> Result<(), FsError> {
        if self.native.is_none() {
            return Ok(());
        }
        let flushed = self.flush();
        self.dispose();
        flushed
    }

    fn copy_to(&mut self, other: &mut dyn StreamProxy) -> Result<u64, FsError> {
        let proxy = self.proxy;
        let readable = self.can_read();
        copy_native(proxy, readable, self.client_mut(), other)
    }

    fn client_mut(&mut self) -> Option<StreamClient<'_>> {
        match self.native.as_mut()? {
            Native::File(file) => Some(StreamClient::File(file)),
            Native::Memory(cursor) => Some(StreamClient::Memory(cursor)),
        }
    }
}

/// Copy the rest of `source` into `other` when both are backed by the same
/// kind of native stream, `source` is readable and `other` is writable.
pub(crate) fn copy_native(
    proxy: &'static str,
    readable: bool,
    source: Option<StreamClient<'_>>,
    other: &mut dyn StreamProxy,
) -> Result<u64, FsError> {
    let source = source.ok_or(FsError::Disposed { proxy })?;
    if other.is_disposed() {
        return Err(FsError::Disposed {
            proxy: other.proxy_name(),
        });
    }
    let other_name = other.proxy_name();
    let writable = other.can_write();
    let required = source.kind().describe();
    let mismatch = |actual: String| FsError::InvalidArgument {
        operation: "copy_to",
        proxy,
        contract: "StreamProxy",
        required,
        actual,
    };
    let capable = || {
        if readable && writable {
            Ok(())
        } else {
            Err(FsError::NotSupported {
                operation: "copy_to",
            })
        }
    };

    let Some(target) = other.client_mut() else {
        return Err(mismatch(format!("{other_name} with no native stream")));
    };
    let copied = match (source, target) {
        (StreamClient::File(src), StreamClient::File(dst)) => {
            capable()?;
            io::copy(src, dst)?
        }
        (StreamClient::Memory(src), StreamClient::Memory(dst)) => {
            capable()?;
            io::copy(src, dst)?
        }
        (_, target) => {
            return Err(mismatch(format!(
                "{other_name} backed by {}",
                target.kind().describe()
            )));
        }
    };
    tracing::debug!(proxy, to = other_name, bytes = copied, "copied stream");
    Ok(copied)
}

/// Non-owning [`StreamProxy`] over another proxy's stream.
///
/// Every operation delegates to the borrowed stream. Closing or disposing
/// the view only detaches it: later calls on the view fail with
/// [`FsError::Disposed`] while the owner keeps working.
pub struct StreamView<'a> {
    inner: &'a mut dyn StreamProxy,
    detached: bool,
}

impl<'a> StreamView<'a> {
    /// A view of `inner`.
    pub fn new(inner: &'a mut dyn StreamProxy) -> Self {
        Self {
            inner,
            detached: false,
        }
    }

    fn live(&self) -> Result<&dyn StreamProxy, FsError> {
        if self.detached {
            return Err(FsError::Disposed {
                proxy: "StreamView",
            });
        }
        Ok(&*self.inner)
    }

    fn live_mut(&mut self) -> Result<&mut dyn StreamProxy, FsError> {
        if self.detached {
            return Err(FsError::Disposed {
                proxy: "StreamView",
            });
        }
        Ok(&mut *self.inner)
    }
}

impl Dispose for StreamView<'_> {
    fn dispose(&mut self) {
        self.detached = true;
    }

    fn is_disposed(&self) -> bool {
        self.detached || self.inner.is_disposed()
    }
}

impl StreamProxy for StreamView<'_> {
    fn proxy_name(&self) -> &'static str {
        "StreamView"
    }

    fn can_read(&self) -> bool {
        !self.detached && self.inner.can_read()
    }

    fn can_write(&self) -> bool {
        !self.detached && self.inner.can_write()
    }

    fn can_seek(&self) -> bool {
        !self.detached && self.inner.can_seek()
    }

    fn can_timeout(&self) -> bool {
        !self.detached && self.inner.can_timeout()
    }

    fn length(&self) -> Result<u64, FsError> {
        self.live()?.length()
    }

    fn position(&self) -> Result<u64, FsError> {
        self.live()?.position()
    }

    fn read_timeout(&self) -> Result<Duration, FsError> {
        self.live()?.read_timeout()
    }

    fn write_timeout(&self) -> Result<Duration, FsError> {
        self.live()?.write_timeout()
    }

    fn flush(&mut self) -> Result<(), FsError> {
        self.live_mut()?.flush()
    }

    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize, FsError> {
        self.live_mut()?.read(buffer, offset, count)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<(), FsError> {
        self.live_mut()?.write(buffer, offset, count)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, FsError> {
        self.live_mut()?.seek(offset, origin)
    }

    fn close(&mut self) -> Result<(), FsError> {
        if self.detached {
            return Ok(());
        }
        let flushed = self.inner.flush();
        self.detached = true;
        flushed
    }

    fn copy_to(&mut self, other: &mut dyn StreamProxy) -> Result<u64, FsError> {
        self.live_mut()?.copy_to(other)
    }

    fn client_mut(&mut self) -> Option<StreamClient<'_>> {
        if self.detached {
            return None;
        }
        self.inner.client_mut()
    }
}
