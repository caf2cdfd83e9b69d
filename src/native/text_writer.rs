//! Buffered UTF-8 text writer over a [`Stream`].

use super::stream::StreamView;
use crate::{Dispose, Encoding, FsError, Stream, StreamProxy, TextWriterProxy, WriterOptions};

/// [`TextWriterProxy`] that owns its backing [`Stream`].
///
/// Text is collected in an internal buffer and written to the stream when the
/// buffer passes [`WriterOptions::buffer_capacity`], on
/// [`flush`](TextWriterProxy::flush), and on every write while
/// [`auto_flush`](TextWriterProxy::auto_flush) is set.
///
/// Disposing the writer flushes pending text and releases the stream. Use
/// [`into_inner`](TextWriter::into_inner) to keep the stream instead.
///
/// # Example
///
/// ```rust
/// use fsproxy::{SeekOrigin, Stream, StreamProxy, TextWriter, TextWriterProxy};
///
/// let mut writer = TextWriter::new(Stream::memory(Vec::new()));
/// writer.write_line_str("alpha")?;
/// writer.write_i64(42)?;
///
/// let mut stream = writer.into_inner()?;
/// stream.seek(0, SeekOrigin::Begin)?;
/// let mut buf = [0u8; 16];
/// let n = stream.read(&mut buf, 0, 16)?;
/// assert_eq!(&buf[..n], b"alpha\n42");
/// # Ok::<(), fsproxy::FsError>(())
/// ```
pub struct TextWriter {
    stream: Option<Stream>,
    buffer: String,
    options: WriterOptions,
}

impl TextWriter {
    /// A writer over `stream` with default options.
    pub fn new(stream: Stream) -> Self {
        Self::with_options(stream, WriterOptions::default())
    }

    /// A writer over `stream` configured by `options`.
    pub fn with_options(stream: Stream, options: WriterOptions) -> Self {
        Self {
            stream: Some(stream),
            buffer: String::with_capacity(options.buffer_capacity),
            options,
        }
    }

    /// Flush pending text and hand back the backing stream without
    /// releasing it.
    ///
    /// # Errors
    ///
    /// - [`FsError::Disposed`] if the writer was already disposed
    /// - any error from writing the pending text
    pub fn into_inner(mut self) -> Result<Stream, FsError> {
        self.flush_buffer()?;
        self.stream.take().ok_or(FsError::Disposed {
            proxy: "TextWriter",
        })
    }

    fn stream_mut(&mut self) -> Result<&mut Stream, FsError> {
        self.stream.as_mut().ok_or(FsError::Disposed {
            proxy: "TextWriter",
        })
    }

    fn flush_buffer(&mut self) -> Result<(), FsError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let stream = self.stream.as_mut().ok_or(FsError::Disposed {
            proxy: "TextWriter",
        })?;
        stream.write(self.buffer.as_bytes(), 0, self.buffer.len())?;
        self.buffer.clear();
        Ok(())
    }
}

impl Dispose for TextWriter {
    fn dispose(&mut self) {
        if self.stream.is_none() {
            return;
        }
        if let Err(error) = TextWriterProxy::flush(self) {
            tracing::warn!(%error, "discarding unflushed text on dispose");
        }
        self.buffer.clear();
        if let Some(mut stream) = self.stream.take() {
            stream.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.stream.is_none()
    }
}

impl Drop for TextWriter {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for TextWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextWriter")
            .field("stream", &self.stream)
            .field("pending", &self.buffer.len())
            .field("options", &self.options)
            .finish()
    }
}

impl TextWriterProxy for TextWriter {
    fn new_line(&self) -> &str {
        &self.options.new_line
    }

    fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    fn base_stream(&mut self) -> Result<Box<dyn StreamProxy + '_>, FsError> {
        self.flush_buffer()?;
        let stream = self.stream_mut()?;
        Ok(Box::new(StreamView::new(stream)))
    }

    fn auto_flush(&self) -> bool {
        self.options.auto_flush
    }

    fn set_auto_flush(&mut self, auto_flush: bool) -> Result<(), FsError> {
        self.stream_mut()?;
        self.options.auto_flush = auto_flush;
        if auto_flush {
            TextWriterProxy::flush(self)?;
        }
        Ok(())
    }

    fn write_str(&mut self, value: &str) -> Result<(), FsError> {
        self.stream_mut()?;
        self.buffer.push_str(value);
        if self.options.auto_flush {
            TextWriterProxy::flush(self)
        } else if self.buffer.len() >= self.options.buffer_capacity {
            self.flush_buffer()
        } else {
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<(), FsError> {
        self.flush_buffer()?;
        self.stream_mut()?.flush()
    }

    fn close(&mut self) -> Result<(), FsError> {
        if self.stream.is_none() {
            return Ok(());
        }
        let flushed = TextWriterProxy::flush(self);
        self.buffer.clear();
        if let Some(mut stream) = self.stream.take() {
            stream.close()?;
        }
        flushed
    }
}
