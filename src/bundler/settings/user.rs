//! Caller-supplied packaging options.

use serde::Deserialize;
use std::{fmt, path::PathBuf, sync::Arc};

/// Artifact rename policy.
///
/// Called once per produced `.rpm` with the destination template and the
/// artifact's file name; returns the destination path, which may still contain
/// `{{option}}` references. Those are rendered against the resolved options
/// before the artifact is moved.
#[derive(Clone)]
pub struct Rename(Arc<dyn Fn(&str, &str) -> String + Send + Sync>);

impl Rename {
    /// Wraps a rename function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Computes the destination for `file_name` under `dest`.
    pub fn apply(&self, dest: &str, file_name: &str) -> String {
        (self.0)(dest, file_name)
    }
}

impl Default for Rename {
    /// `<dest>/{{name}}-{{version}}-{{revision}}.{{arch}}.rpm`
    fn default() -> Self {
        Self::new(|dest, _file_name| {
            PathBuf::from(dest)
                .join("{{name}}-{{version}}-{{revision}}.{{arch}}.rpm")
                .to_string_lossy()
                .into_owned()
        })
    }
}

impl fmt::Debug for Rename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rename(<fn>)")
    }
}

/// Options as given by the caller, before defaults are applied.
///
/// Deserializes from JSON or TOML configuration files using camelCase keys,
/// e.g. `{"productName": "Demo", "requires": ["lsb"]}`. Every field is
/// optional; unset fields are filled in by [`resolve`](super::resolve).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserOptions {
    /// Directory containing the built application.
    pub src: Option<PathBuf>,
    /// Destination directory or path template for the artifact.
    pub dest: Option<String>,

    pub name: Option<String>,
    pub product_name: Option<String>,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub product_description: Option<String>,
    pub version: Option<String>,
    pub revision: Option<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,

    /// Target architecture; Node.js and Rust spellings are accepted.
    pub arch: Option<String>,
    /// Runtime package dependencies.
    pub requires: Option<Vec<String>>,
    /// Desktop menu categories.
    pub categories: Option<Vec<String>>,
    /// Executable name inside `src`.
    pub bin: Option<String>,
    /// Icon file copied to `/usr/share/pixmaps`.
    pub icon: Option<PathBuf>,

    /// Handlebars template replacing the bundled spec template.
    pub spec_template: Option<PathBuf>,
    /// Handlebars template replacing the bundled desktop entry template.
    pub desktop_template: Option<PathBuf>,
    /// rpmbuild executable.
    pub rpmbuild: Option<PathBuf>,

    /// Artifact rename policy. Not configurable from files.
    #[serde(skip)]
    pub rename: Option<Rename>,
}

impl UserOptions {
    /// Layers `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn merge(self, overrides: UserOptions) -> UserOptions {
        UserOptions {
            src: overrides.src.or(self.src),
            dest: overrides.dest.or(self.dest),
            name: overrides.name.or(self.name),
            product_name: overrides.product_name.or(self.product_name),
            generic_name: overrides.generic_name.or(self.generic_name),
            description: overrides.description.or(self.description),
            product_description: overrides.product_description.or(self.product_description),
            version: overrides.version.or(self.version),
            revision: overrides.revision.or(self.revision),
            license: overrides.license.or(self.license),
            homepage: overrides.homepage.or(self.homepage),
            arch: overrides.arch.or(self.arch),
            requires: overrides.requires.or(self.requires),
            categories: overrides.categories.or(self.categories),
            bin: overrides.bin.or(self.bin),
            icon: overrides.icon.or(self.icon),
            spec_template: overrides.spec_template.or(self.spec_template),
            desktop_template: overrides.desktop_template.or(self.desktop_template),
            rpmbuild: overrides.rpmbuild.or(self.rpmbuild),
            rename: overrides.rename.or(self.rename),
        }
    }
}
