//! # fsproxy
//!
//! Substitutable proxies for files, directories, streams and OS handles.
//!
//! Application code talks to small capability traits instead of `std::fs`
//! directly. In production each trait is backed by a native adapter that owns
//! exactly one std or OS object; in tests the same call sites take doubles.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fsproxy::{
//!     DirectoryEntry, DirectoryInfoProxy, FileEntry, FileInfoProxy, FileMode, FileOpenOptions,
//!     FileAccess, FsError, StreamProxyExt,
//! };
//!
//! fn archive(dir: &dyn DirectoryInfoProxy, file: &dyn FileInfoProxy) -> Result<Vec<u8>, FsError> {
//!     dir.create()?;
//!     let mut writer = file.create_text()?;
//!     writer.write_line_str("archived")?;
//!     writer.close()?;
//!
//!     let mut stream = file.open(FileOpenOptions::new(FileMode::Open).access(FileAccess::Read))?;
//!     stream.read_to_end()
//! }
//!
//! let dir = DirectoryEntry::new("/tmp/archive/2024")?;
//! let file = FileEntry::new("/tmp/archive/2024/index.txt")?;
//! assert_eq!(archive(&dir, &file)?, b"archived\n");
//! # Ok::<(), FsError>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Trait | Native adapter | Wraps |
//! |-------|----------------|-------|
//! | [`HandleProxy`] | [`SafeFileHandle`] | an owned or borrowed file descriptor |
//! | [`StreamProxy`] | [`Stream`], [`StreamView`] | a file or an in-memory buffer |
//! | [`FileStreamProxy`] | [`FileStream`] | a file opened from a path |
//! | [`TextWriterProxy`] | [`TextWriter`] | a buffered UTF-8 writer over a [`Stream`] |
//! | [`FileInfoProxy`] | [`FileEntry`] | a file path |
//! | [`DirectoryInfoProxy`] | [`DirectoryEntry`] | a directory path |
//!
//! [`SecurityDescriptor`] is the access-control value (owner, group, mode
//! bits) passed to `set_access_control` and `create_with_security`.
//!
//! ---
//!
//! ## Ownership and Disposal
//!
//! Every adapter that owns an OS resource implements [`Dispose`]: the first
//! `dispose` releases the resource, later calls do nothing, and `Drop`
//! disposes too. Operations on a disposed proxy fail with
//! [`FsError::Disposed`].
//!
//! Views never release what they borrow. A [`StreamView`] from
//! `base_stream` or a borrowed [`SafeFileHandle`] from `safe_handle` only
//! detaches itself when closed.
//!
//! ---
//!
//! ## Same-Kind Copies
//!
//! [`StreamProxy::copy_to`] copies natively between two streams backed by
//! the same kind of resource (file to file, memory to memory). Anything else
//! fails with [`FsError::InvalidArgument`] naming the proxy, the contract and
//! the required kind, and neither stream moves:
//!
//! ```rust
//! use fsproxy::{FsError, Stream, StreamProxy};
//!
//! let mut source = Stream::memory(b"bytes".to_vec());
//! let mut target = Stream::memory(Vec::new());
//! assert_eq!(source.copy_to(&mut target)?, 5);
//! # Ok::<(), FsError>(())
//! ```
//!
//! ---
//!
//! ## Platform
//!
//! Unix only: handles are file descriptors, share modes and byte-range locks
//! are advisory `flock`/`fcntl` locks, and descriptors carry uid, gid and
//! mode bits.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for option and value types, plus the JSON helpers [`StreamProxyExtJson`] and [`TextWriterExtJson`] |

#[cfg(not(unix))]
compile_error!("fsproxy supports Unix platforms only");

// Private modules
mod error;
mod ext;
mod native;
mod traits;
mod types;
mod writer;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - value types
pub use types::{
    AccessSections, DescriptorKind, Encoding, FileAccess, FileMode, FileOpenOptions, FileShare,
    Permissions, SeekOrigin, StreamKind, WriterOptions,
};

// Public re-exports - proxy traits
pub use traits::{
    DirectoryInfoProxy, Dispose, FileInfoProxy, FileStreamProxy, HandleProxy, StreamClient,
    StreamProxy, TextWriterProxy,
};

// Public re-exports - native adapters
pub use native::{
    DirectoryEntry, FileEntry, FileStream, SafeFileHandle, SecurityDescriptor, Stream, StreamView,
    TextWriter,
};

// Public re-exports - infrastructure
pub use ext::{StreamIo, StreamProxyExt};
pub use writer::DirectoryWriter;

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::{StreamProxyExtJson, TextWriterExtJson};
