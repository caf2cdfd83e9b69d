//! Value types shared by the proxy traits and native adapters.

use std::io::SeekFrom;

/// How the OS should open or create a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileMode {
    /// Create a new file; fail if it already exists.
    CreateNew,
    /// Create a new file, truncating any existing one.
    Create,
    /// Open an existing file; fail if it is missing.
    Open,
    /// Open the file if it exists, otherwise create it.
    OpenOrCreate,
    /// Open an existing file and truncate it to zero length.
    Truncate,
    /// Open or create the file and position writes at its end.
    Append,
}

/// Access requested when opening a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileAccess {
    /// Read-only access.
    Read,
    /// Write-only access.
    Write,
    /// Read and write access.
    #[default]
    ReadWrite,
}

impl FileAccess {
    /// Returns `true` if reading is allowed.
    #[inline]
    pub const fn can_read(self) -> bool {
        matches!(self, FileAccess::Read | FileAccess::ReadWrite)
    }

    /// Returns `true` if writing is allowed.
    #[inline]
    pub const fn can_write(self) -> bool {
        matches!(self, FileAccess::Write | FileAccess::ReadWrite)
    }
}

/// What other opens of the same file may do while this one is held.
///
/// Enforced cooperatively with whole-file advisory locks: only other
/// proxies honour it, not arbitrary processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileShare {
    /// Exclusive use.
    None,
    /// Others may read.
    #[default]
    Read,
    /// Others may write.
    Write,
    /// Others may read and write.
    ReadWrite,
}

/// Everything needed to open a [`FileStream`](crate::FileStream) from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileOpenOptions {
    /// Open/create disposition.
    pub mode: FileMode,
    /// Requested access.
    pub access: FileAccess,
    /// Sharing granted to other opens.
    pub share: FileShare,
    /// Reported by `is_async`; the stream itself always blocks.
    pub asynchronous: bool,
}

impl FileOpenOptions {
    /// Options for `mode` with read-write access and read sharing.
    pub const fn new(mode: FileMode) -> Self {
        Self {
            mode,
            access: FileAccess::ReadWrite,
            share: FileShare::Read,
            asynchronous: false,
        }
    }

    /// Replace the requested access.
    pub const fn access(mut self, access: FileAccess) -> Self {
        self.access = access;
        self
    }

    /// Replace the sharing mode.
    pub const fn share(mut self, share: FileShare) -> Self {
        self.share = share;
        self
    }

    /// Mark the stream as opened for asynchronous use.
    pub const fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    // Append only makes sense for writers, so it never grants read access.
    pub(crate) fn effective_access(&self) -> FileAccess {
        match (self.mode, self.access) {
            (FileMode::Append, _) => FileAccess::Write,
            (_, access) => access,
        }
    }
}

/// Reference point for [`StreamProxy::seek`](crate::StreamProxy::seek).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeekOrigin {
    /// From the start of the stream.
    Begin,
    /// From the current position.
    Current,
    /// From the end of the stream.
    End,
}

impl SeekOrigin {
    pub(crate) fn seek_from(self, offset: i64) -> Option<SeekFrom> {
        match self {
            SeekOrigin::Begin => u64::try_from(offset).ok().map(SeekFrom::Start),
            SeekOrigin::Current => Some(SeekFrom::Current(offset)),
            SeekOrigin::End => Some(SeekFrom::End(offset)),
        }
    }
}

/// Native resource kind behind a stream proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// An open file descriptor.
    File,
    /// A growable in-memory buffer.
    Memory,
}

impl StreamKind {
    /// Human-readable description used in diagnostics.
    pub const fn describe(self) -> &'static str {
        match self {
            StreamKind::File => "a file stream",
            StreamKind::Memory => "a memory stream",
        }
    }
}

/// What a [`SecurityDescriptor`](crate::SecurityDescriptor) may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptorKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

impl DescriptorKind {
    /// Human-readable description used in diagnostics.
    pub const fn describe(self) -> &'static str {
        match self {
            DescriptorKind::File => "a file descriptor",
            DescriptorKind::Directory => "a directory descriptor",
        }
    }
}

/// Which parts of a security descriptor to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessSections {
    /// Owning user.
    pub owner: bool,
    /// Owning group.
    pub group: bool,
    /// Permission bits.
    pub access: bool,
}

impl AccessSections {
    /// Nothing.
    pub const NONE: Self = Self {
        owner: false,
        group: false,
        access: false,
    };

    /// Permission bits only.
    pub const ACCESS: Self = Self {
        owner: false,
        group: false,
        access: true,
    };

    /// Owner, group and permission bits.
    pub const ALL: Self = Self {
        owner: true,
        group: true,
        access: true,
    };
}

/// Unix-style permissions stored as a mode bitmask.
///
/// Uses the standard Unix permission bits (rwxrwxrwx).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permissions(u32);

impl Permissions {
    /// Create permissions from a Unix mode (e.g., 0o755).
    #[inline]
    pub const fn from_mode(mode: u32) -> Self {
        Self(mode & 0o7777)
    }

    /// Get the raw mode value.
    #[inline]
    pub const fn mode(&self) -> u32 {
        self.0
    }

    /// Returns `true` if these permissions deny writing.
    #[inline]
    pub const fn readonly(&self) -> bool {
        (self.0 & 0o222) == 0
    }

    /// The same permissions with every write bit cleared or set.
    #[inline]
    pub const fn with_readonly(self, readonly: bool) -> Self {
        if readonly {
            Self(self.0 & !0o222)
        } else {
            Self(self.0 | 0o200)
        }
    }
}

/// Text encoding of a [`TextWriter`](crate::TextWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// UTF-8 without byte-order mark.
    #[default]
    Utf8,
}

impl Encoding {
    /// IANA name of the encoding.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
        }
    }
}

/// Configuration of a [`TextWriter`](crate::TextWriter).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriterOptions {
    /// Terminator emitted by the `write_line` family.
    pub new_line: String,
    /// Flush after every write.
    pub auto_flush: bool,
    /// Capacity of the internal text buffer in bytes.
    pub buffer_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            new_line: "\n".to_owned(),
            auto_flush: false,
            buffer_capacity: 8 * 1024,
        }
    }
}

/// A locked byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ByteRange {
    pub position: u64,
    pub length: u64,
}

impl ByteRange {
    pub(crate) fn overlaps(&self, other: &ByteRange) -> bool {
        let end = self.position.saturating_add(self.length);
        let other_end = other.position.saturating_add(other.length);
        self.position < other_end && other.position < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_from_mode_masks_extra_bits() {
        let p = Permissions::from_mode(0o100755);
        assert_eq!(p.mode(), 0o755);
    }

    #[test]
    fn permissions_readonly() {
        assert!(Permissions::from_mode(0o444).readonly());
        assert!(!Permissions::from_mode(0o644).readonly());
    }

    #[test]
    fn permissions_with_readonly_toggles_write_bits() {
        let ro = Permissions::from_mode(0o664).with_readonly(true);
        assert_eq!(ro.mode(), 0o444);
        let rw = ro.with_readonly(false);
        assert_eq!(rw.mode(), 0o644);
    }

    #[test]
    fn file_access_flags() {
        assert!(FileAccess::Read.can_read());
        assert!(!FileAccess::Read.can_write());
        assert!(!FileAccess::Write.can_read());
        assert!(FileAccess::ReadWrite.can_read() && FileAccess::ReadWrite.can_write());
    }

    #[test]
    fn append_is_write_only() {
        let options = FileOpenOptions::new(FileMode::Append).access(FileAccess::ReadWrite);
        assert_eq!(options.effective_access(), FileAccess::Write);
        let options = FileOpenOptions::new(FileMode::Open).access(FileAccess::Read);
        assert_eq!(options.effective_access(), FileAccess::Read);
    }

    #[test]
    fn seek_origin_rejects_negative_begin() {
        assert_eq!(SeekOrigin::Begin.seek_from(-1), None);
        assert_eq!(SeekOrigin::Begin.seek_from(4), Some(SeekFrom::Start(4)));
        assert_eq!(SeekOrigin::End.seek_from(-2), Some(SeekFrom::End(-2)));
    }

    #[test]
    fn byte_ranges_overlap() {
        let a = ByteRange {
            position: 0,
            length: 10,
        };
        let b = ByteRange {
            position: 10,
            length: 5,
        };
        let c = ByteRange {
            position: 9,
            length: 1,
        };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn writer_options_defaults() {
        let options = WriterOptions::default();
        assert_eq!(options.new_line, "\n");
        assert!(!options.auto_flush);
        assert_eq!(Encoding::default().name(), "utf-8");
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileMode>();
        assert_send_sync::<FileOpenOptions>();
        assert_send_sync::<Permissions>();
        assert_send_sync::<WriterOptions>();
        assert_send_sync::<AccessSections>();
    }
}
