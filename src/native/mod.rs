//! # Native Adapters
//!
//! One adapter per proxy trait, each wrapping the std or OS object that the
//! corresponding filesystem call produces.
//!
//! | Adapter | Implements | Wraps |
//! |---------|------------|-------|
//! | [`SafeFileHandle`] | [`HandleProxy`](crate::HandleProxy) | `OwnedFd` / `BorrowedFd` |
//! | [`SecurityDescriptor`] | (value) | owner, group, mode bits |
//! | [`Stream`] | [`StreamProxy`](crate::StreamProxy) | `File` or `Cursor<Vec<u8>>` |
//! | [`FileStream`] | [`FileStreamProxy`](crate::FileStreamProxy) | `File` plus its path |
//! | [`TextWriter`] | [`TextWriterProxy`](crate::TextWriterProxy) | a [`Stream`] |
//! | [`FileEntry`] | [`FileInfoProxy`](crate::FileInfoProxy) | an absolute path |
//! | [`DirectoryEntry`] | [`DirectoryInfoProxy`](crate::DirectoryInfoProxy) | an absolute path |

mod directory_entry;
mod file_entry;
mod file_stream;
mod handle;
mod security;
mod stream;
mod sys;
mod text_writer;

pub use directory_entry::DirectoryEntry;
pub use file_entry::FileEntry;
pub use file_stream::FileStream;
pub use handle::SafeFileHandle;
pub use security::SecurityDescriptor;
pub use stream::{Stream, StreamView};
pub use text_writer::TextWriter;
