//! # Extension Traits
//!
//! Convenience methods layered on the proxy contracts.
//!
//! ## Overview
//!
//! [`StreamProxyExt`] provides operations that are not part of
//! [`StreamProxy`] itself but follow from it. They are default methods with a
//! blanket implementation, so every stream proxy, including `dyn StreamProxy`
//! and test doubles, gets them for free.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`read_to_end`](StreamProxyExt::read_to_end) | Read the rest of the stream |
//! | [`write_all`](StreamProxyExt::write_all) | Write a whole slice |
//! | [`rewind`](StreamProxyExt::rewind) | Seek back to the start |
//! | [`io`](StreamProxyExt::io) | Borrow as `std::io::{Read, Write, Seek}` |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled:
//!
//! | Method | Description |
//! |--------|-------------|
//! | `StreamProxyExtJson::read_json` | Deserialize the rest of a stream |
//! | `TextWriterExtJson::write_json` | Serialize a value through a text writer |
//!
//! Enable with:
//! ```toml
//! [dependencies]
//! fsproxy = { version = "0.1", features = ["serde"] }
//! ```

use std::io;

use crate::{FsError, SeekOrigin, StreamProxy};

const CHUNK: usize = 8 * 1024;

/// Extension methods for any stream proxy.
///
/// # Example
///
/// ```rust
/// use fsproxy::{FsError, Stream, StreamProxyExt};
///
/// let mut stream = Stream::memory(Vec::new());
/// stream.write_all(b"hello")?;
/// stream.rewind()?;
/// assert_eq!(stream.read_to_end()?, b"hello");
/// # Ok::<(), FsError>(())
/// ```
pub trait StreamProxyExt: StreamProxy {
    /// Read from the current position to the end of the stream.
    fn read_to_end(&mut self) -> Result<Vec<u8>, FsError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; CHUNK];
        loop {
            let n = self.read(&mut chunk, 0, CHUNK)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    /// Write all of `data` at the current position.
    fn write_all(&mut self, data: &[u8]) -> Result<(), FsError> {
        self.write(data, 0, data.len())
    }

    /// Seek to the start of the stream.
    fn rewind(&mut self) -> Result<(), FsError> {
        self.seek(0, SeekOrigin::Begin).map(|_| ())
    }

    /// Borrow the proxy as a [`StreamIo`] for std I/O adapters.
    ///
    /// ```rust
    /// use fsproxy::{Stream, StreamProxyExt};
    /// use std::io::{BufRead, BufReader};
    ///
    /// let mut stream = Stream::memory(b"one\ntwo\n".to_vec());
    /// let lines: Vec<String> = BufReader::new(stream.io())
    ///     .lines()
    ///     .collect::<Result<_, _>>()?;
    /// assert_eq!(lines, ["one", "two"]);
    /// # Ok::<(), std::io::Error>(())
    /// ```
    fn io(&mut self) -> StreamIo<'_, Self> {
        StreamIo { inner: self }
    }
}

impl<S: StreamProxy + ?Sized> StreamProxyExt for S {}

/// A borrowed stream proxy implementing [`io::Read`], [`io::Write`] and
/// [`io::Seek`].
///
/// Errors are converted with `From<FsError> for io::Error`.
#[derive(Debug)]
pub struct StreamIo<'a, S: ?Sized> {
    inner: &'a mut S,
}

impl<S: StreamProxy + ?Sized> io::Read for StreamIo<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();
        Ok(StreamProxy::read(&mut *self.inner, buf, 0, len)?)
    }
}

impl<S: StreamProxy + ?Sized> io::Write for StreamIo<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        StreamProxy::write(&mut *self.inner, buf, 0, buf.len())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(StreamProxy::flush(&mut *self.inner)?)
    }
}

impl<S: StreamProxy + ?Sized> io::Seek for StreamIo<'_, S> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, origin) = match pos {
            io::SeekFrom::Start(offset) => (
                i64::try_from(offset).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset too large")
                })?,
                SeekOrigin::Begin,
            ),
            io::SeekFrom::Current(offset) => (offset, SeekOrigin::Current),
            io::SeekFrom::End(offset) => (offset, SeekOrigin::End),
        };
        Ok(StreamProxy::seek(&mut *self.inner, offset, origin)?)
    }
}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use crate::TextWriterProxy;
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON deserialization for stream proxies.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait StreamProxyExtJson: StreamProxyExt {
        /// Read the rest of the stream and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::Deserialization` if the bytes are not valid JSON for `T`
        /// - any error from reading the stream
        fn read_json<T: DeserializeOwned>(&mut self) -> Result<T, FsError> {
            let data = self.read_to_end()?;
            serde_json::from_slice(&data).map_err(|e| FsError::Deserialization(e.to_string()))
        }
    }

    impl<S: StreamProxy + ?Sized> StreamProxyExtJson for S {}

    /// JSON serialization for text writers.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait TextWriterExtJson: TextWriterProxy {
        /// Serialize `value` as pretty-printed JSON and write it.
        ///
        /// # Errors
        ///
        /// - `FsError::Serialization` if `value` cannot be serialized
        /// - any error from the writer
        fn write_json<T: Serialize>(&mut self, value: &T) -> Result<(), FsError> {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
            self.write_str(&json)
        }
    }

    impl<W: TextWriterProxy + ?Sized> TextWriterExtJson for W {}
}

#[cfg(feature = "serde")]
pub use json::{StreamProxyExtJson, TextWriterExtJson};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stream;
    use std::io::{Read, Seek, Write};

    #[test]
    fn read_to_end_spans_chunks() {
        let data: Vec<u8> = (0..CHUNK * 2 + 17).map(|i| i as u8).collect();
        let mut stream = Stream::memory(data.clone());
        assert_eq!(stream.read_to_end().unwrap(), data);
        assert!(stream.read_to_end().unwrap().is_empty());
    }

    #[test]
    fn write_all_then_rewind() {
        let mut stream = Stream::memory(Vec::new());
        stream.write_all(b"abc").unwrap();
        stream.write_all(b"def").unwrap();
        stream.rewind().unwrap();
        assert_eq!(stream.position().unwrap(), 0);
        assert_eq!(stream.read_to_end().unwrap(), b"abcdef");
    }

    #[test]
    fn works_through_trait_objects() {
        let mut stream = Stream::memory(b"dyn".to_vec());
        let proxy: &mut dyn StreamProxy = &mut stream;
        assert_eq!(proxy.read_to_end().unwrap(), b"dyn");
    }

    #[test]
    fn io_adapter_reads_writes_and_seeks() {
        let mut stream = Stream::memory(Vec::new());
        {
            let mut adapter = stream.io();
            adapter.write_all(b"0123456789").unwrap();
            adapter.seek(io::SeekFrom::Start(2)).unwrap();
            let mut buf = [0u8; 3];
            adapter.read_exact(&mut buf).unwrap();
            assert_eq!(&buf, b"234");
            assert_eq!(adapter.seek(io::SeekFrom::End(-1)).unwrap(), 9);
            assert_eq!(adapter.stream_position().unwrap(), 9);
        }
        assert_eq!(stream.position().unwrap(), 9);
    }

    #[test]
    fn io_adapter_maps_errors() {
        let mut stream = Stream::memory_read_only(b"x".to_vec());
        let err = stream.io().write(b"y").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip_through_writer_and_stream() {
        use crate::TextWriter;

        let mut writer = TextWriter::new(Stream::memory(Vec::new()));
        writer
            .write_json(&serde_json::json!({ "name": "fsproxy", "ok": true }))
            .unwrap();
        let mut stream = writer.into_inner().unwrap();
        stream.rewind().unwrap();
        let value: serde_json::Value = stream.read_json().unwrap();
        assert_eq!(value["name"], "fsproxy");
        assert_eq!(value["ok"], true);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn read_json_reports_invalid_data() {
        let mut stream = Stream::memory(b"{ not json".to_vec());
        let err = stream.read_json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, FsError::Deserialization(_)));
    }
}
