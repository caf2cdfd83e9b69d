//! Access-control descriptors: owner, group and permission bits.

use std::fs::{self, File, Metadata};
use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use crate::{AccessSections, DescriptorKind, FsError, Permissions};

/// Security descriptor for a file or a directory.
///
/// An immutable value: construct it empty, load it from a path, or build it
/// from metadata already in hand, then pass it to
/// [`FileStreamProxy::set_access_control`](crate::FileStreamProxy::set_access_control)
/// or
/// [`DirectoryInfoProxy::create_with_security`](crate::DirectoryInfoProxy::create_with_security).
///
/// Each descriptor carries the [`DescriptorKind`] it was built for; applying
/// a file descriptor to a directory (or the reverse) is rejected.
///
/// Sections that were not loaded are `None` and are left untouched when the
/// descriptor is applied.
///
/// # Example
///
/// ```rust
/// use fsproxy::{DescriptorKind, Permissions, SecurityDescriptor};
///
/// let private = SecurityDescriptor::new(DescriptorKind::Directory)
///     .with_permissions(Permissions::from_mode(0o700));
/// assert_eq!(private.permissions().map(|p| p.mode()), Some(0o700));
/// assert_eq!(private.owner(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecurityDescriptor {
    kind: DescriptorKind,
    owner: Option<u32>,
    group: Option<u32>,
    permissions: Option<Permissions>,
}

impl SecurityDescriptor {
    /// An empty descriptor.
    pub const fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            owner: None,
            group: None,
            permissions: None,
        }
    }

    /// Load the requested sections of the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if `path` does not exist
    pub fn load(
        path: &Path,
        kind: DescriptorKind,
        sections: AccessSections,
    ) -> Result<Self, FsError> {
        let metadata = fs::metadata(path).map_err(|e| FsError::io("load_security", path, e))?;
        Ok(Self::representing(kind, &metadata, sections))
    }

    /// Wrap the descriptor carried by metadata that was already obtained.
    pub fn representing(
        kind: DescriptorKind,
        metadata: &Metadata,
        sections: AccessSections,
    ) -> Self {
        Self {
            kind,
            owner: sections.owner.then(|| metadata.uid()),
            group: sections.group.then(|| metadata.gid()),
            permissions: sections
                .access
                .then(|| Permissions::from_mode(metadata.mode())),
        }
    }

    /// The same descriptor with the owning user set.
    pub const fn with_owner(mut self, uid: u32) -> Self {
        self.owner = Some(uid);
        self
    }

    /// The same descriptor with the owning group set.
    pub const fn with_group(mut self, gid: u32) -> Self {
        self.group = Some(gid);
        self
    }

    /// The same descriptor with the permission bits set.
    pub const fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// What the descriptor may be applied to.
    pub const fn kind(&self) -> DescriptorKind {
        self.kind
    }

    /// Owning user, if loaded.
    pub const fn owner(&self) -> Option<u32> {
        self.owner
    }

    /// Owning group, if loaded.
    pub const fn group(&self) -> Option<u32> {
        self.group
    }

    /// Permission bits, if loaded.
    pub const fn permissions(&self) -> Option<Permissions> {
        self.permissions
    }

    pub(crate) fn require(
        &self,
        kind: DescriptorKind,
        operation: &'static str,
        proxy: &'static str,
        contract: &'static str,
    ) -> Result<(), FsError> {
        if self.kind == kind {
            return Ok(());
        }
        Err(FsError::InvalidArgument {
            operation,
            proxy,
            contract,
            required: kind.describe(),
            actual: self.kind.describe().to_owned(),
        })
    }

    pub(crate) fn apply_to_file(&self, file: &File) -> io::Result<()> {
        let current = file.metadata()?;
        if let Some(owner) = self.ownership_change(&current) {
            std::os::unix::fs::fchown(file, owner.0, owner.1)?;
        }
        if let Some(permissions) = self.permissions {
            file.set_permissions(fs::Permissions::from_mode(permissions.mode()))?;
        }
        Ok(())
    }

    pub(crate) fn apply_to_path(&self, path: &Path) -> io::Result<()> {
        let current = fs::metadata(path)?;
        if let Some(owner) = self.ownership_change(&current) {
            std::os::unix::fs::chown(path, owner.0, owner.1)?;
        }
        if let Some(permissions) = self.permissions {
            fs::set_permissions(path, fs::Permissions::from_mode(permissions.mode()))?;
        }
        Ok(())
    }

    // Skip chown when nothing changes so unprivileged callers can reapply
    // a descriptor they loaded.
    fn ownership_change(&self, current: &Metadata) -> Option<(Option<u32>, Option<u32>)> {
        let owner = self.owner.filter(|&uid| uid != current.uid());
        let group = self.group.filter(|&gid| gid != current.gid());
        (owner.is_some() || group.is_some()).then_some((owner, group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_descriptor_has_no_sections() {
        let d = SecurityDescriptor::new(DescriptorKind::File);
        assert_eq!(d.kind(), DescriptorKind::File);
        assert_eq!(d.owner(), None);
        assert_eq!(d.group(), None);
        assert_eq!(d.permissions(), None);
    }

    #[test]
    fn load_respects_sections() {
        let dir = tempfile::tempdir().unwrap();
        let only_access =
            SecurityDescriptor::load(dir.path(), DescriptorKind::Directory, AccessSections::ACCESS)
                .unwrap();
        assert!(only_access.permissions().is_some());
        assert_eq!(only_access.owner(), None);

        let all =
            SecurityDescriptor::load(dir.path(), DescriptorKind::Directory, AccessSections::ALL)
                .unwrap();
        assert!(all.owner().is_some());
        assert!(all.group().is_some());
    }

    #[test]
    fn load_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = SecurityDescriptor::load(&missing, DescriptorKind::File, AccessSections::ALL)
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn require_rejects_other_kind() {
        let d = SecurityDescriptor::new(DescriptorKind::File);
        assert!(d
            .require(DescriptorKind::File, "op", "Proxy", "Contract")
            .is_ok());
        let err = d
            .require(
                DescriptorKind::Directory,
                "create_with_security",
                "DirectoryEntry",
                "DirectoryInfoProxy",
            )
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DirectoryEntry"));
        assert!(msg.contains("DirectoryInfoProxy"));
        assert!(msg.contains("a directory descriptor"));
    }

    #[test]
    fn apply_to_path_sets_mode_and_reloads_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        let d = SecurityDescriptor::new(DescriptorKind::File)
            .with_permissions(Permissions::from_mode(0o640));
        d.apply_to_path(&path).unwrap();
        let loaded = SecurityDescriptor::load(&path, DescriptorKind::File, AccessSections::ACCESS)
            .unwrap();
        assert_eq!(loaded, d);
    }

    #[test]
    fn reapplying_own_ownership_needs_no_privilege() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        let loaded =
            SecurityDescriptor::load(&path, DescriptorKind::File, AccessSections::ALL).unwrap();
        loaded.apply_to_path(&path).unwrap();
    }
}
