//! Buffered text writer capability contract.
//!
//! The required methods cover configuration, the backing stream, and
//! [`write_str`](TextWriterProxy::write_str); every typed `write`/`write_line`
//! variant is provided on top of them, so a test double only implements the
//! core.
//!
//! Because the trait provides `write_fmt`, the standard `write!` and
//! `writeln!` macros work on any text writer proxy.

use std::fmt;

use super::{Dispose, StreamProxy};
use crate::{Encoding, FsError};

/// Buffered text writer over a byte stream.
///
/// When [`auto_flush`](TextWriterProxy::auto_flush) is `true`, every write
/// operation flushes down to the backing stream before returning.
pub trait TextWriterProxy: Dispose {
    /// Line terminator written by the `write_line` family.
    fn new_line(&self) -> &str;

    /// Encoding used for the backing bytes.
    fn encoding(&self) -> Encoding;

    /// A view of the backing stream. Closing the view leaves the writer intact.
    ///
    /// # Errors
    ///
    /// - [`FsError::Disposed`] if the writer is disposed
    fn base_stream(&mut self) -> Result<Box<dyn StreamProxy + '_>, FsError>;

    /// Whether every write flushes.
    fn auto_flush(&self) -> bool;

    /// Toggle flushing after every write. Enabling it flushes pending text.
    fn set_auto_flush(&mut self, auto_flush: bool) -> Result<(), FsError>;

    /// Write a string.
    fn write_str(&mut self, value: &str) -> Result<(), FsError>;

    /// Flush buffered text to the backing stream.
    fn flush(&mut self) -> Result<(), FsError>;

    /// Flush and release the writer and the stream it owns.
    fn close(&mut self) -> Result<(), FsError>;

    /// Write a character.
    fn write_char(&mut self, value: char) -> Result<(), FsError> {
        let mut buf = [0u8; 4];
        self.write_str(value.encode_utf8(&mut buf))
    }

    /// Write a character array.
    fn write_chars(&mut self, value: &[char]) -> Result<(), FsError> {
        self.write_str(&value.iter().collect::<String>())
    }

    /// Write `count` characters of `buffer` starting at `index`.
    ///
    /// # Errors
    ///
    /// - [`FsError::OutOfRange`] if the range does not fit in `buffer`
    fn write_chars_range(
        &mut self,
        buffer: &[char],
        index: usize,
        count: usize,
    ) -> Result<(), FsError> {
        let slice = char_range(buffer, index, count)?;
        self.write_chars(slice)
    }

    /// Write a boolean as `true`/`false`.
    fn write_bool(&mut self, value: bool) -> Result<(), FsError> {
        self.write_str(if value { "true" } else { "false" })
    }

    /// Write a signed integer.
    fn write_i64(&mut self, value: i64) -> Result<(), FsError> {
        self.write_str(&value.to_string())
    }

    /// Write an unsigned integer.
    fn write_u64(&mut self, value: u64) -> Result<(), FsError> {
        self.write_str(&value.to_string())
    }

    /// Write a floating-point number.
    fn write_f64(&mut self, value: f64) -> Result<(), FsError> {
        self.write_str(&value.to_string())
    }

    /// Write formatted text. Enables `write!(writer, ...)`.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), FsError> {
        match args.as_str() {
            Some(s) => self.write_str(s),
            None => self.write_str(&args.to_string()),
        }
    }

    /// Write the line terminator.
    fn write_line(&mut self) -> Result<(), FsError> {
        let new_line = self.new_line().to_owned();
        self.write_str(&new_line)
    }

    /// Write a string followed by the line terminator.
    fn write_line_str(&mut self, value: &str) -> Result<(), FsError> {
        let line = format!("{value}{}", self.new_line());
        self.write_str(&line)
    }

    /// Write a character followed by the line terminator.
    fn write_line_char(&mut self, value: char) -> Result<(), FsError> {
        let line = format!("{value}{}", self.new_line());
        self.write_str(&line)
    }

    /// Write a character array followed by the line terminator.
    fn write_line_chars(&mut self, value: &[char]) -> Result<(), FsError> {
        let line: String = value.iter().collect();
        self.write_line_str(&line)
    }

    /// Write `count` characters of `buffer` starting at `index`, then the
    /// line terminator.
    ///
    /// # Errors
    ///
    /// - [`FsError::OutOfRange`] if the range does not fit in `buffer`
    fn write_line_chars_range(
        &mut self,
        buffer: &[char],
        index: usize,
        count: usize,
    ) -> Result<(), FsError> {
        let slice = char_range(buffer, index, count)?;
        self.write_line_chars(slice)
    }

    /// Write a boolean followed by the line terminator.
    fn write_line_bool(&mut self, value: bool) -> Result<(), FsError> {
        self.write_line_str(if value { "true" } else { "false" })
    }

    /// Write a signed integer followed by the line terminator.
    fn write_line_i64(&mut self, value: i64) -> Result<(), FsError> {
        self.write_line_str(&value.to_string())
    }

    /// Write an unsigned integer followed by the line terminator.
    fn write_line_u64(&mut self, value: u64) -> Result<(), FsError> {
        self.write_line_str(&value.to_string())
    }

    /// Write a floating-point number followed by the line terminator.
    fn write_line_f64(&mut self, value: f64) -> Result<(), FsError> {
        self.write_line_str(&value.to_string())
    }
}

fn char_range(buffer: &[char], index: usize, count: usize) -> Result<&[char], FsError> {
    index
        .checked_add(count)
        .and_then(|end| buffer.get(index..end))
        .ok_or(FsError::OutOfRange {
            offset: index,
            count,
            len: buffer.len(),
        })
}
