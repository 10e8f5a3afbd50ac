//! Packaging options loaded from a configuration file.
//!
//! `.toml` files are parsed as TOML; anything else as JSON. Keys are the
//! camelCase option names, e.g.
//!
//! ```json
//! { "productName": "Demo", "requires": ["lsb", "libnotify"], "categories": ["Utility"] }
//! ```

use crate::bundler::UserOptions;
use crate::error::{CliError, Result};
use anyhow::Context;
use std::path::Path;

/// Reads options from `path`.
pub async fn load(path: &Path) -> Result<UserOptions> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let options = if is_toml {
        toml::from_str(&text).map_err(|e| invalid(path, e.to_string()))?
    } else {
        serde_json::from_str(&text).map_err(|e| invalid(path, e.to_string()))?
    };

    log::debug!("Loaded options from {}", path.display());
    Ok(options)
}

fn invalid(path: &Path, reason: String) -> crate::error::AppError {
    CliError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}
