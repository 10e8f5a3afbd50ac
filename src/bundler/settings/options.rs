//! Resolved package options shared by every pipeline stage.

use super::Rename;
use serde::Serialize;
use std::path::PathBuf;

/// Fully resolved packaging options.
///
/// Built once by [`resolve`](super::resolve) and read-only afterwards. Every
/// string field a template can reference is always defined; optional inputs
/// have already fallen back through their precedence chain. Serializes with
/// camelCase keys, which are the names templates use (`{{productName}}`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOptions {
    pub name: String,
    pub product_name: String,
    pub generic_name: String,
    pub description: String,
    /// Wrapped to [`DESCRIPTION_WIDTH`](super::DESCRIPTION_WIDTH) columns.
    pub product_description: String,
    pub version: String,
    pub revision: String,
    pub license: String,
    /// Empty when neither the caller nor the metadata provide one.
    pub homepage: String,

    /// RPM target architecture (`x86_64`, `aarch64`, ...).
    pub arch: String,
    pub requires: Vec<String>,
    pub categories: Vec<String>,
    /// Executable name inside the application directory.
    pub bin: String,

    /// Icon to install; `None` installs the bundled default icon.
    #[serde(skip)]
    pub icon: Option<PathBuf>,
    /// Application directory being packaged.
    pub src: PathBuf,
    /// Destination template handed to [`Rename`].
    pub dest: String,

    #[serde(skip)]
    pub rename: Rename,
    #[serde(skip)]
    pub spec_template: Option<PathBuf>,
    #[serde(skip)]
    pub desktop_template: Option<PathBuf>,
    #[serde(skip)]
    pub rpmbuild: PathBuf,
}

impl PackageOptions {
    /// `{name}_{version}_{arch}`, the prefix of the staging directory name.
    pub fn staging_prefix(&self) -> String {
        format!("{}_{}_{}", self.name, self.version, self.arch)
    }

    /// License file read from the application directory.
    pub fn license_path(&self) -> PathBuf {
        self.src.join("LICENSE")
    }
}
