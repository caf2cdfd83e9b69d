//! Byte stream capability contract.
//!
//! [`StreamProxy`] mirrors a seekable byte stream: capability flags, length,
//! position, buffered-slice reads and writes, seeking, and a same-kind
//! `copy_to`. Every operation delegates to one native resource.
//!
//! # Client accessor
//!
//! [`StreamProxy::client_mut`] exposes the native resource as a tagged
//! borrow ([`StreamClient`]). It exists only for interop between proxies,
//! most importantly `copy_to`, which transfers bytes natively between two
//! resources of the same [`StreamKind`] and refuses everything else.
//!
//! # Example
//!
//! ```rust
//! use fsproxy::{FsError, SeekOrigin, Stream, StreamProxy};
//!
//! fn rewind_and_copy(
//!     src: &mut dyn StreamProxy,
//!     dst: &mut dyn StreamProxy,
//! ) -> Result<u64, FsError> {
//!     src.seek(0, SeekOrigin::Begin)?;
//!     src.copy_to(dst)
//! }
//!
//! let mut src = Stream::memory(b"hello".to_vec());
//! let mut dst = Stream::memory(Vec::new());
//! src.seek(0, SeekOrigin::End).unwrap();
//! assert_eq!(rewind_and_copy(&mut src, &mut dst).unwrap(), 5);
//! ```

use std::fs::File;
use std::io::Cursor;
use std::time::Duration;

use super::Dispose;
use crate::{FsError, SeekOrigin, StreamKind};

/// Tagged mutable borrow of the native resource behind a stream proxy.
#[derive(Debug)]
pub enum StreamClient<'a> {
    /// An open file.
    File(&'a mut File),
    /// An in-memory buffer.
    Memory(&'a mut Cursor<Vec<u8>>),
}

impl StreamClient<'_> {
    /// The kind tag of the borrowed resource.
    pub fn kind(&self) -> StreamKind {
        match self {
            StreamClient::File(_) => StreamKind::File,
            StreamClient::Memory(_) => StreamKind::Memory,
        }
    }
}

/// Byte stream capability contract.
///
/// # Errors
///
/// Operations fail with whatever the underlying resource signals. Operations
/// gated by a capability flag fail with [`FsError::NotSupported`] when the
/// flag is `false`; operations on a disposed stream fail with
/// [`FsError::Disposed`].
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StreamProxy`.
pub trait StreamProxy: Dispose {
    /// Concrete proxy kind, used in diagnostics.
    fn proxy_name(&self) -> &'static str;

    /// Whether the stream supports reading. `false` once disposed.
    fn can_read(&self) -> bool;

    /// Whether the stream supports writing. `false` once disposed.
    fn can_write(&self) -> bool;

    /// Whether the stream supports seeking. `false` once disposed.
    fn can_seek(&self) -> bool;

    /// Whether the stream supports read/write timeouts.
    fn can_timeout(&self) -> bool;

    /// Length of the stream in bytes.
    fn length(&self) -> Result<u64, FsError>;

    /// Current position in the stream.
    fn position(&self) -> Result<u64, FsError>;

    /// Read timeout.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotSupported`] if [`can_timeout`](StreamProxy::can_timeout) is `false`
    fn read_timeout(&self) -> Result<Duration, FsError>;

    /// Write timeout.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotSupported`] if [`can_timeout`](StreamProxy::can_timeout) is `false`
    fn write_timeout(&self) -> Result<Duration, FsError>;

    /// Push buffered data down to the resource.
    fn flush(&mut self) -> Result<(), FsError>;

    /// Read up to `count` bytes into `buffer[offset..offset + count]`.
    ///
    /// Returns the number of bytes read; `0` signals end of stream.
    ///
    /// # Errors
    ///
    /// - [`FsError::OutOfRange`] if the slice does not fit in `buffer`
    /// - [`FsError::NotSupported`] if the stream is not readable
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize, FsError>;

    /// Write all of `buffer[offset..offset + count]`.
    ///
    /// # Errors
    ///
    /// - [`FsError::OutOfRange`] if the slice does not fit in `buffer`
    /// - [`FsError::NotSupported`] if the stream is not writable
    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<(), FsError>;

    /// Move the position and return the new absolute position.
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, FsError>;

    /// Flush and release the stream.
    ///
    /// Unlike [`Dispose::dispose`], close reports a failing final flush.
    fn close(&mut self) -> Result<(), FsError>;

    /// Copy the rest of this stream into `other`, natively.
    ///
    /// Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if `other` is not backed by the same
    ///   kind of resource; neither position moves in that case
    /// - [`FsError::NotSupported`] if this stream cannot read or `other`
    ///   cannot write
    /// - [`FsError::Disposed`] if either stream is disposed
    fn copy_to(&mut self, other: &mut dyn StreamProxy) -> Result<u64, FsError>;

    /// Borrow the native resource, or `None` if there is none (disposed, or
    /// an implementation not backed by a native resource).
    fn client_mut(&mut self) -> Option<StreamClient<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stream double with no native resource behind it.
    struct CountingStream {
        written: usize,
        disposed: bool,
    }

    impl Dispose for CountingStream {
        fn dispose(&mut self) {
            self.disposed = true;
        }

        fn is_disposed(&self) -> bool {
            self.disposed
        }
    }

    impl StreamProxy for CountingStream {
        fn proxy_name(&self) -> &'static str {
            "CountingStream"
        }
        fn can_read(&self) -> bool {
            false
        }
        fn can_write(&self) -> bool {
            !self.disposed
        }
        fn can_seek(&self) -> bool {
            false
        }
        fn can_timeout(&self) -> bool {
            false
        }
        fn length(&self) -> Result<u64, FsError> {
            Err(FsError::NotSupported { operation: "length" })
        }
        fn position(&self) -> Result<u64, FsError> {
            Ok(self.written as u64)
        }
        fn read_timeout(&self) -> Result<Duration, FsError> {
            Err(FsError::NotSupported {
                operation: "read_timeout",
            })
        }
        fn write_timeout(&self) -> Result<Duration, FsError> {
            Err(FsError::NotSupported {
                operation: "write_timeout",
            })
        }
        fn flush(&mut self) -> Result<(), FsError> {
            Ok(())
        }
        fn read(&mut self, _: &mut [u8], _: usize, _: usize) -> Result<usize, FsError> {
            Err(FsError::NotSupported { operation: "read" })
        }
        fn write(&mut self, _: &[u8], _: usize, count: usize) -> Result<(), FsError> {
            self.written += count;
            Ok(())
        }
        fn seek(&mut self, _: i64, _: SeekOrigin) -> Result<u64, FsError> {
            Err(FsError::NotSupported { operation: "seek" })
        }
        fn close(&mut self) -> Result<(), FsError> {
            self.dispose();
            Ok(())
        }
        fn copy_to(&mut self, _: &mut dyn StreamProxy) -> Result<u64, FsError> {
            Err(FsError::NotSupported {
                operation: "copy_to",
            })
        }
        fn client_mut(&mut self) -> Option<StreamClient<'_>> {
            None
        }
    }

    #[test]
    fn trait_is_object_safe() {
        let mut double = CountingStream {
            written: 0,
            disposed: false,
        };
        let proxy: &mut dyn StreamProxy = &mut double;
        proxy.write(b"abcd", 1, 2).unwrap();
        assert_eq!(proxy.position().unwrap(), 2);
        assert!(proxy.client_mut().is_none());
    }

    #[test]
    fn client_kind_tags() {
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(StreamClient::Memory(&mut cursor).kind(), StreamKind::Memory);
    }

    #[test]
    fn close_disposes_double() {
        let mut double = CountingStream {
            written: 0,
            disposed: false,
        };
        double.close().unwrap();
        assert!(double.is_disposed());
        assert!(!double.can_write());
    }
}
