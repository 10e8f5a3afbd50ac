//! External tool detection and availability checking.

use crate::bundler::{Error, Result};
use std::path::{Path, PathBuf};

/// Locates the rpmbuild executable.
///
/// Accepts a bare command name (searched in `PATH`) or a path.
pub fn find_rpmbuild(program: &Path) -> Result<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found rpmbuild at: {}", path.display());
            Ok(path)
        }
        Err(e) => Err(Error::GenericError(format!(
            "{} not found: {}. Install the rpm-build package \
             (dnf install rpm-build, apt install rpm) or set RPMBUILD.",
            program.display(),
            e
        ))),
    }
}
