//! Path-bound directory adapter.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::{DescriptorKind, DirectoryInfoProxy, FsError, SecurityDescriptor};

/// [`DirectoryInfoProxy`] bound to one absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    path: PathBuf,
}

impl DirectoryEntry {
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

    fn root_path(&self) -> PathBuf {
        self.path
            .components()
            .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
            .collect()
    }
}

impl DirectoryInfoProxy for DirectoryEntry {
    fn exists(&self) -> bool {
        self.path.is_dir()
    }

    fn full_name(&self) -> &Path {
        &self.path
    }

    fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().into_owned(),
        }
    }

    fn parent(&self) -> Option<Box<dyn DirectoryInfoProxy>> {
        let parent = self.path.parent()?;
        Some(Box::new(Self::representing(parent.to_path_buf())))
    }

    fn root(&self) -> Box<dyn DirectoryInfoProxy> {
        Box::new(Self::representing(self.root_path()))
    }

    fn create(&self) -> Result<(), FsError> {
        fs::create_dir_all(&self.path).map_err(|e| FsError::io("create", &self.path, e))?;
        tracing::debug!(path = %self.path.display(), "created directory");
        Ok(())
    }

    fn create_with_security(&self, descriptor: &SecurityDescriptor) -> Result<(), FsError> {
        descriptor.require(
            DescriptorKind::Directory,
            "create_with_security",
            "DirectoryEntry",
            "DirectoryInfoProxy",
        )?;
        self.create()?;
        descriptor
            .apply_to_path(&self.path)
            .map_err(|e| FsError::io("create_with_security", &self.path, e))
    }
}
