//! Error types for the fsproxy abstraction layer.

use std::io;
use std::path::{Path, PathBuf};

/// Proxy error type with contextual variants.
///
/// OS failures are carried through unchanged in meaning: [`FsError::io`]
/// only sorts them into the matching variant and attaches the path.
/// [`FsError::InvalidArgument`] and [`FsError::InvalidOperation`] are the
/// only kinds raised by the proxies themselves.
///
/// # Examples
///
/// ```rust
/// use fsproxy::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/missing") };
/// assert!(err.to_string().contains("/missing"));
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    // Path/File Errors
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Path already exists when it shouldn't.
    #[error("{operation}: already exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    // Permission/Access Errors
    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// Another open of the same file holds an incompatible share lock.
    #[error("sharing violation: {path}")]
    SharingViolation {
        /// The path that could not be shared.
        path: PathBuf,
    },

    /// A byte range could not be locked.
    #[error("lock violation: range {position}+{length}")]
    LockViolation {
        /// Start of the requested range.
        position: u64,
        /// Length of the requested range.
        length: u64,
    },

    /// A byte range was unlocked that this stream does not hold.
    #[error("range {position}+{length} is not locked by this stream")]
    NotLocked {
        /// Start of the requested range.
        position: u64,
        /// Length of the requested range.
        length: u64,
    },

    // Contract Errors
    /// Operation is not supported by the underlying resource.
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// The argument proxy cannot be resolved to the resource kind required.
    #[error(
        "{operation} on a {proxy} implementation of {contract} requires an argument backed by {required}, got {actual}"
    )]
    InvalidArgument {
        /// The operation that rejected the argument.
        operation: &'static str,
        /// Concrete kind of the proxy executing the operation.
        proxy: &'static str,
        /// The trait contract being violated.
        contract: &'static str,
        /// The resource kind the operation requires.
        required: &'static str,
        /// What the argument actually resolved to.
        actual: String,
    },

    /// The target of the operation has not been confirmed valid.
    #[error("{operation}: {reason}")]
    InvalidOperation {
        /// The operation that was attempted.
        operation: &'static str,
        /// Why the operation cannot proceed.
        reason: String,
    },

    /// Buffer offset and count do not describe a slice of the buffer.
    #[error("offset {offset} + count {count} exceeds buffer of length {len}")]
    OutOfRange {
        /// Requested start index.
        offset: usize,
        /// Requested element count.
        count: usize,
        /// Length of the supplied buffer.
        len: usize,
    },

    /// The proxy has been disposed.
    #[error("cannot access a disposed {proxy}")]
    Disposed {
        /// Concrete kind of the disposed proxy.
        proxy: &'static str,
    },

    /// Handle is invalid, closed, or its reference count is unbalanced.
    #[error("invalid handle: {reason}")]
    InvalidHandle {
        /// What is wrong with the handle.
        reason: &'static str,
    },

    // Data Errors
    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stream contents could not be deserialized.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Sort an OS error into the matching variant, keeping the path.
    pub fn io(operation: &'static str, path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path, operation },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path, operation },
            _ => FsError::Io {
                operation,
                path,
                source: error,
            },
        }
    }
}

impl From<io::Error> for FsError {
    fn from(error: io::Error) -> Self {
        FsError::io("io", Path::new(""), error)
    }
}

impl From<FsError> for io::Error {
    fn from(error: FsError) -> Self {
        let kind = match error {
            FsError::Io { source, .. } => return source,
            FsError::NotFound { .. } => io::ErrorKind::NotFound,
            FsError::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            FsError::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            FsError::SharingViolation { .. }
            | FsError::LockViolation { .. }
            | FsError::NotLocked { .. } => io::ErrorKind::WouldBlock,
            FsError::NotSupported { .. } => io::ErrorKind::Unsupported,
            FsError::InvalidArgument { .. } | FsError::OutOfRange { .. } => {
                io::ErrorKind::InvalidInput
            }
            FsError::Serialization(_) | FsError::Deserialization(_) => io::ErrorKind::InvalidData,
            FsError::InvalidOperation { .. }
            | FsError::Disposed { .. }
            | FsError::InvalidHandle { .. } => io::ErrorKind::Other,
        };
        io::Error::new(kind, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_not_found_display() {
        let err = FsError::NotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.to_string(), "not found: /missing");
    }

    #[test]
    fn fs_error_already_exists_display() {
        let err = FsError::AlreadyExists {
            path: PathBuf::from("/exists"),
            operation: "copy_to",
        };
        assert_eq!(err.to_string(), "copy_to: already exists: /exists");
    }

    #[test]
    fn invalid_argument_names_proxy_and_contract() {
        let err = FsError::InvalidArgument {
            operation: "copy_to",
            proxy: "FileStream",
            contract: "StreamProxy",
            required: "a file stream",
            actual: "a memory stream".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("FileStream"));
        assert!(msg.contains("StreamProxy"));
        assert!(msg.contains("a file stream"));
        assert!(msg.contains("a memory stream"));
    }

    #[test]
    fn io_keeps_path_for_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err = FsError::io("open", Path::new("/a.txt"), io_err);
        assert!(matches!(err, FsError::NotFound { ref path } if path == Path::new("/a.txt")));
    }

    #[test]
    fn io_permission_denied_keeps_operation() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let err = FsError::io("create", Path::new("/a.txt"), io_err);
        assert!(matches!(
            err,
            FsError::PermissionDenied {
                operation: "create",
                ..
            }
        ));
    }

    #[test]
    fn fs_error_from_io_other() {
        let io_err = io::Error::new(io::ErrorKind::Other, "test");
        let fs_err = FsError::from(io_err);
        assert!(matches!(fs_err, FsError::Io { .. }));
    }

    #[test]
    fn io_error_round_trips_source() {
        let io_err = io::Error::new(io::ErrorKind::Interrupted, "boom");
        let back: io::Error = FsError::from(io_err).into();
        assert_eq!(back.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn disposed_maps_to_other() {
        let err: io::Error = FsError::Disposed { proxy: "Stream" }.into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(err.to_string().contains("disposed Stream"));
    }
}
