//! rpmbuild top-dir staging tree.

use super::{PackageOptions, Result, error::ErrorExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ephemeral rpmbuild top directory for a single packaging run.
///
/// The directory name starts with `{name}_{version}_{arch}_` and ends in a
/// random suffix, so concurrent runs never share a tree. The tree is removed
/// when this value is dropped unless [`StagingTree::keep`] was called.
///
/// ```text
/// <root>/SPECS/<name>.spec
/// <root>/BUILD/usr/bin/<name>
/// <root>/BUILD/usr/share/<name>/
/// <root>/BUILD/usr/share/applications/<name>.desktop
/// <root>/BUILD/usr/share/pixmaps/<name>.png
/// <root>/BUILD/usr/share/doc/<name>/copyright
/// <root>/RPMS/<arch>/
/// ```
#[derive(Debug)]
pub struct StagingTree {
    dir: TempDir,
    name: String,
    arch: String,
}

impl StagingTree {
    /// Allocates the staging directory under the system temp root and creates
    /// the full layout.
    pub async fn create(options: &PackageOptions) -> Result<Self> {
        let prefix = format!("{}_", options.staging_prefix());
        let temp_root = std::env::temp_dir();
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(&temp_root)
            .fs_context("allocating staging directory in", &temp_root)?;

        let tree = Self {
            dir,
            name: options.name.clone(),
            arch: options.arch.clone(),
        };

        for path in tree.layout() {
            tokio::fs::create_dir_all(&path)
                .await
                .fs_context("creating staging directory", &path)?;
        }

        log::debug!("Created staging tree at {}", tree.root().display());
        Ok(tree)
    }

    fn layout(&self) -> Vec<PathBuf> {
        let root = self.root();
        vec![
            root.join("SPECS"),
            root.join("SOURCES"),
            root.join("SRPMS"),
            root.join("BUILDROOT"),
            self.rpms_dir(),
            self.bin_dir(),
            self.app_dir(),
            self.applications_dir(),
            self.pixmaps_dir(),
            self.doc_dir(),
        ]
    }

    /// Root of the tree, used as rpmbuild's `%_topdir`.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Rendered spec file path.
    pub fn spec_path(&self) -> PathBuf {
        self.root().join("SPECS").join(format!("{}.spec", self.name))
    }

    /// Rendered macros, kept in the tree for inspection.
    pub fn macros_path(&self) -> PathBuf {
        self.root().join(".rpmmacros")
    }

    /// Mirror of the installed `/usr` hierarchy.
    pub fn usr_dir(&self) -> PathBuf {
        self.root().join("BUILD").join("usr")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.usr_dir().join("bin")
    }

    /// Application payload, installed as `/usr/share/<name>`.
    pub fn app_dir(&self) -> PathBuf {
        self.usr_dir().join("share").join(&self.name)
    }

    pub fn applications_dir(&self) -> PathBuf {
        self.usr_dir().join("share").join("applications")
    }

    pub fn pixmaps_dir(&self) -> PathBuf {
        self.usr_dir().join("share").join("pixmaps")
    }

    pub fn doc_dir(&self) -> PathBuf {
        self.usr_dir().join("share").join("doc").join(&self.name)
    }

    /// Directory rpmbuild writes binary packages for the target arch into.
    pub fn rpms_dir(&self) -> PathBuf {
        self.root().join("RPMS").join(&self.arch)
    }

    /// Keeps the tree on disk after this value is dropped and returns its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}
