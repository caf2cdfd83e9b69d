//! Explicit, idempotent release of a wrapped native resource.

/// Explicit release of the native resource a proxy owns.
///
/// `dispose` must be idempotent: the first call releases the resource,
/// every later call is a no-op. Owning adapters also dispose from `Drop`,
/// so the resource is released on every exit path even when nobody calls
/// this explicitly.
///
/// Views (proxies over a resource they do not own) only detach themselves
/// when disposed; the owner keeps the resource alive.
///
/// # Example
///
/// ```rust
/// use fsproxy::{Dispose, Stream, StreamProxy};
///
/// let mut stream = Stream::memory(b"abc".to_vec());
/// stream.dispose();
/// stream.dispose(); // no-op
/// assert!(stream.is_disposed());
/// assert!(!stream.can_read());
/// ```
pub trait Dispose {
    /// Release the wrapped resource. Repeated calls do nothing.
    fn dispose(&mut self);

    /// Returns `true` once [`dispose`](Dispose::dispose) has run.
    fn is_disposed(&self) -> bool;
}
