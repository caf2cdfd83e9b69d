//! # Proxy Traits
//!
//! One capability contract per kind of filesystem resource.
//!
//! ## Components
//!
//! Listed leaf to root; no trait depends on anything below it in this list.
//!
//! | Trait | Mirrors | Native adapter |
//! |-------|---------|----------------|
//! | [`HandleProxy`] | A raw OS file handle | [`SafeFileHandle`](crate::SafeFileHandle) |
//! | [`StreamProxy`] | A seekable byte stream | [`Stream`](crate::Stream) |
//! | [`FileStreamProxy`] | A stream opened on a file | [`FileStream`](crate::FileStream) |
//! | [`TextWriterProxy`] | A buffered text writer | [`TextWriter`](crate::TextWriter) |
//! | [`FileInfoProxy`] | A file path | [`FileEntry`](crate::FileEntry) |
//! | [`DirectoryInfoProxy`] | A directory path | [`DirectoryEntry`](crate::DirectoryEntry) |
//!
//! Entry proxies take a path and hand out lower-level proxies; those wrap
//! the native object produced by the corresponding OS call.
//!
//! ## Ownership
//!
//! Each adapter owns exactly one native resource, released through
//! [`Dispose`] or on drop. Views (`safe_handle`, `base_stream`) borrow the
//! owner's resource and never release it.
//!
//! ## Object Safety
//!
//! All traits are object-safe, so call sites can accept `&dyn FileInfoProxy`
//! and tests can hand them a double:
//!
//! ```rust
//! use fsproxy::{FileInfoProxy, FsError};
//!
//! fn ensure_file(file: &dyn FileInfoProxy) -> Result<bool, FsError> {
//!     if file.exists() {
//!         return Ok(false);
//!     }
//!     file.create()?.close()?;
//!     Ok(true)
//! }
//! ```

mod directory_info;
mod dispose;
mod file_info;
mod file_stream;
mod handle;
mod stream;
mod text_writer;

pub use directory_info::DirectoryInfoProxy;
pub use dispose::Dispose;
pub use file_info::FileInfoProxy;
pub use file_stream::FileStreamProxy;
pub use handle::HandleProxy;
pub use stream::{StreamClient, StreamProxy};
pub use text_writer::TextWriterProxy;
