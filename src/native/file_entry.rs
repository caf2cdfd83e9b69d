//! Path-bound file adapter.

use std::fs;
use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{
    DirectoryEntry, DirectoryInfoProxy, FileAccess, FileInfoProxy, FileMode, FileOpenOptions,
    FileShare, FileStream, FileStreamProxy, FsError, Permissions, TextWriter, TextWriterProxy,
};

/// [`FileInfoProxy`] bound to one absolute path.
///
/// Metadata is read fresh from the filesystem on every call; nothing is
/// cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    path: PathBuf,
}

impl FileEntry {
    /// Bind to `path`, made absolute against the current directory.
    ///
    /// The path is not normalized and need not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FsError> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|e| FsError::io("absolute", path, e))?;
        Ok(Self { path: absolute })
    }

    /// Wrap a path that is already absolute.
    pub fn representing(path: PathBuf) -> Self {
        Self { path }
    }

    /// The bound path.
    pub fn client(&self) -> &Path {
        &self.path
    }

    fn metadata(&self, operation: &'static str) -> Result<fs::Metadata, FsError> {
        fs::metadata(&self.path).map_err(|e| FsError::io(operation, &self.path, e))
    }

    fn open_stream(&self, options: FileOpenOptions) -> Result<FileStream, FsError> {
        FileStream::open(&self.path, options)
    }

    fn refuse_self_copy(&self, destination: &Path) -> Result<(), FsError> {
        let Ok(target) = fs::metadata(destination) else {
            return Ok(());
        };
        let source = self.metadata("copy_to")?;
        if (source.dev(), source.ino()) == (target.dev(), target.ino()) {
            return Err(FsError::InvalidOperation {
                operation: "copy_to",
                reason: format!(
                    "{} and {} are the same file",
                    self.path.display(),
                    destination.display()
                ),
            });
        }
        Ok(())
    }

    /// Copy into a destination that must not exist yet. A partially written
    /// destination is removed on failure.
    fn copy_new(&self, destination: &Path) -> Result<(), FsError> {
        let mut source =
            fs::File::open(&self.path).map_err(|e| FsError::io("copy_to", &self.path, e))?;
        let permissions = source
            .metadata()
            .map_err(|e| FsError::io("copy_to", &self.path, e))?
            .permissions();
        let mut target = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .map_err(|e| FsError::io("copy_to", destination, e))?;

        let written = io::copy(&mut source, &mut target)
            .and_then(|_| target.set_permissions(permissions));
        if let Err(e) = written {
            drop(target);
            if let Err(cleanup) = fs::remove_file(destination) {
                tracing::warn!(
                    path = %destination.display(),
                    error = %cleanup,
                    "failed to remove partial copy"
                );
            }
            return Err(FsError::io("copy_to", destination, e));
        }
        Ok(())
    }

    fn text_writer(&self, options: FileOpenOptions) -> Result<Box<dyn TextWriterProxy>, FsError> {
        let stream = self.open_stream(options)?.into_stream();
        Ok(Box::new(TextWriter::new(stream)))
    }
}

impl FileInfoProxy for FileEntry {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn is_read_only(&self) -> Result<bool, FsError> {
        Ok(self.attributes()?.readonly())
    }

    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn directory_name(&self) -> Option<PathBuf> {
        self.path.parent().map(Path::to_path_buf)
    }

    fn full_name(&self) -> &Path {
        &self.path
    }

    fn creation_time(&self) -> Result<SystemTime, FsError> {
        self.metadata("creation_time")?
            .created()
            .map_err(|e| FsError::io("creation_time", &self.path, e))
    }

    fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    }

    fn attributes(&self) -> Result<Permissions, FsError> {
        let metadata = self.metadata("attributes")?;
        Ok(Permissions::from_mode(metadata.permissions().mode()))
    }

    fn set_attributes(&self, attributes: Permissions) -> Result<(), FsError> {
        fs::set_permissions(&self.path, fs::Permissions::from_mode(attributes.mode()))
            .map_err(|e| FsError::io("set_attributes", &self.path, e))
    }

    fn create(&self) -> Result<Box<dyn FileStreamProxy>, FsError> {
        let options = FileOpenOptions::new(FileMode::Create).share(FileShare::None);
        tracing::debug!(path = %self.path.display(), "creating file");
        Ok(Box::new(self.open_stream(options)?))
    }

    fn create_text(&self) -> Result<Box<dyn TextWriterProxy>, FsError> {
        // Reopen an existing file read-write so the writer's base stream can
        // read back what it wrote.
        let options = if self.exists() {
            FileOpenOptions::new(FileMode::Truncate).access(FileAccess::ReadWrite)
        } else {
            FileOpenOptions::new(FileMode::Create).access(FileAccess::Write)
        };
        self.text_writer(options)
    }

    fn append_text(&self) -> Result<Box<dyn TextWriterProxy>, FsError> {
        self.text_writer(FileOpenOptions::new(FileMode::Append).access(FileAccess::Write))
    }

    fn open(&self, options: FileOpenOptions) -> Result<Box<dyn FileStreamProxy>, FsError> {
        Ok(Box::new(self.open_stream(options)?))
    }

    fn copy_to(&self, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        if overwrite {
            self.refuse_self_copy(destination)?;
            fs::copy(&self.path, destination)
                .map_err(|e| FsError::io("copy_to", destination, e))?;
        } else {
            self.copy_new(destination)?;
        }
        tracing::debug!(
            from = %self.path.display(),
            to = %destination.display(),
            overwrite,
            "copied file"
        );
        Ok(())
    }

    fn directory(&self) -> Option<Box<dyn DirectoryInfoProxy>> {
        let parent = self.path.parent()?;
        Some(Box::new(DirectoryEntry::representing(parent.to_path_buf())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeekOrigin, StreamProxy};

    fn entry(dir: &tempfile::TempDir, name: &str) -> FileEntry {
        FileEntry::new(dir.path().join(name)).unwrap()
    }

    #[test]
    fn path_parts() {
        let file = FileEntry::representing(PathBuf::from("/var/log/app.tar.gz"));
        assert_eq!(file.name(), "app.tar.gz");
        assert_eq!(file.extension().as_deref(), Some("gz"));
        assert_eq!(file.directory_name(), Some(PathBuf::from("/var/log")));
        assert_eq!(file.full_name(), Path::new("/var/log/app.tar.gz"));
        assert_eq!(file.client(), Path::new("/var/log/app.tar.gz"));
        let bare = FileEntry::representing(PathBuf::from("/var/log/README"));
        assert_eq!(bare.extension(), None);
    }

    #[test]
    fn relative_path_is_made_absolute() {
        let file = FileEntry::new("some/relative.txt").unwrap();
        assert!(file.full_name().is_absolute());
        assert!(file.full_name().ends_with("some/relative.txt"));
    }

    #[test]
    fn directories_do_not_count_as_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileEntry::new(dir.path()).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn create_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = entry(&dir, "new.bin");
        assert!(!file.exists());
        let mut stream = file.create().unwrap();
        assert!(file.exists());
        assert_eq!(stream.length().unwrap(), 0);
        assert!(stream.can_read() && stream.can_write());
        stream.close().unwrap();
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("old.bin"), b"stale").unwrap();
        let stream = entry(&dir, "old.bin").create().unwrap();
        assert_eq!(stream.length().unwrap(), 0);
    }

    #[test]
    fn create_text_on_missing_file_is_write_only() {
        let dir = tempfile::tempdir().unwrap();
        let file = entry(&dir, "notes.txt");
        let mut writer = file.create_text().unwrap();
        assert!(file.exists());
        let view = writer.base_stream().unwrap();
        assert!(!view.can_read());
        assert_eq!(view.length().unwrap(), 0);
    }

    #[test]
    fn create_text_on_existing_file_truncates_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"previous contents").unwrap();
        let file = entry(&dir, "notes.txt");
        let mut writer = file.create_text().unwrap();
        assert_eq!(fs::metadata(file.full_name()).unwrap().len(), 0);

        writer.write_str("fresh").unwrap();
        let mut view = writer.base_stream().unwrap();
        view.seek(0, SeekOrigin::Begin).unwrap();
        let mut buf = [0u8; 16];
        let n = view.read(&mut buf, 0, 16).unwrap();
        assert_eq!(&buf[..n], b"fresh");
    }

    #[test]
    fn append_text_keeps_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("log"), "one\n").unwrap();
        let mut writer = entry(&dir, "log").append_text().unwrap();
        writer.write_line_str("two").unwrap();
        writer.close().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("log")).unwrap(),
            "one\ntwo\n"
        );
    }

    #[test]
    fn attributes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("f"), b"x").unwrap();
        let file = entry(&dir, "f");
        file.set_attributes(Permissions::from_mode(0o444)).unwrap();
        assert_eq!(file.attributes().unwrap().mode(), 0o444);
        assert!(file.is_read_only().unwrap());
        file.set_attributes(Permissions::from_mode(0o644)).unwrap();
        assert!(!file.is_read_only().unwrap());
    }

    #[test]
    fn metadata_of_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = entry(&dir, "missing");
        assert!(matches!(file.attributes(), Err(FsError::NotFound { .. })));
        assert!(matches!(
            file.open(FileOpenOptions::new(FileMode::Open)),
            Err(FsError::NotFound { .. })
        ));
    }

    #[test]
    fn copy_refuses_existing_destination_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), b"new").unwrap();
        fs::write(dir.path().join("b"), b"old").unwrap();
        let file = entry(&dir, "a");
        let destination = dir.path().join("b");
        assert!(matches!(
            file.copy_to(&destination, false),
            Err(FsError::AlreadyExists { .. })
        ));
        assert_eq!(fs::read(&destination).unwrap(), b"old");
        file.copy_to(&destination, true).unwrap();
        assert_eq!(fs::read(&destination).unwrap(), b"new");
    }

    #[test]
    fn copy_to_fresh_destination_keeps_mode() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), b"data").unwrap();
        let file = entry(&dir, "a");
        file.set_attributes(Permissions::from_mode(0o640)).unwrap();
        let destination = dir.path().join("c");
        file.copy_to(&destination, false).unwrap();
        assert_eq!(fs::read(&destination).unwrap(), b"data");
        let copy = FileEntry::new(&destination).unwrap();
        assert_eq!(copy.attributes().unwrap().mode(), 0o640);
    }

    #[test]
    fn overwrite_onto_itself_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), b"keep me").unwrap();
        let file = entry(&dir, "a");
        let err = file.copy_to(&dir.path().join("a"), true).unwrap_err();
        assert!(matches!(
            err,
            FsError::InvalidOperation {
                operation: "copy_to",
                ..
            }
        ));
        assert_eq!(fs::read(dir.path().join("a")).unwrap(), b"keep me");

        std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("link")).unwrap();
        assert!(file.copy_to(&dir.path().join("link"), true).is_err());
        assert_eq!(fs::read(dir.path().join("a")).unwrap(), b"keep me");
    }

    #[test]
    fn failed_copy_removes_partial_destination() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("not-a-file")).unwrap();
        let source = entry(&dir, "not-a-file");
        let destination = dir.path().join("partial");
        assert!(source.copy_to(&destination, false).is_err());
        assert!(!destination.exists());
    }

    #[test]
    fn directory_is_parent_view() {
        let dir = tempfile::tempdir().unwrap();
        let file = entry(&dir, "child.txt");
        let parent = file.directory().unwrap();
        assert_eq!(parent.full_name(), dir.path());
        assert!(parent.exists());
        assert!(FileEntry::representing(PathBuf::from("/")).directory().is_none());
    }
}
