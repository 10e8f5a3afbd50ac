//! Application metadata discovery from `package.json`.
//!
//! A packaged application ships its `package.json` either inside
//! `resources/app.asar` or unpacked at `resources/app/package.json`.

mod asar;

use crate::bundler::{Error, Result, error::ErrorExt};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Where the application's `package.json` lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSource {
    /// `resources/app.asar` archive.
    Packed(PathBuf),
    /// `resources/app/package.json` file.
    Directory(PathBuf),
    /// Neither exists.
    Missing,
}

impl AppSource {
    /// Probes `src` once and picks the metadata source.
    ///
    /// The archive wins when both exist.
    pub fn probe(src: &Path) -> Self {
        let resources = src.join("resources");
        let archive = resources.join("app.asar");
        if archive.exists() {
            return Self::Packed(archive);
        }

        let descriptor = resources.join("app").join("package.json");
        if descriptor.exists() {
            return Self::Directory(descriptor);
        }

        Self::Missing
    }

    /// Reads and parses `package.json` from this source.
    ///
    /// [`AppSource::Missing`] yields an empty map; defaults are applied later
    /// by [`resolve`](crate::bundler::settings::resolve).
    pub async fn read(&self) -> Result<Map<String, Value>> {
        let (path, bytes) = match self {
            Self::Packed(archive) => {
                log::debug!("Reading package.json from archive {}", archive.display());
                let bytes = asar::read_file(archive, "package.json")
                    .await
                    .map_err(|e| metadata_error(archive, e))?;
                (archive, bytes)
            }
            Self::Directory(descriptor) => {
                log::debug!("Reading {}", descriptor.display());
                let bytes = tokio::fs::read(descriptor)
                    .await
                    .fs_context("reading", descriptor)
                    .map_err(|e| metadata_error(descriptor, e))?;
                (descriptor, bytes)
            }
            Self::Missing => {
                log::warn!("No package.json found, using default metadata");
                return Ok(Map::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::Metadata {
                path: path.clone(),
                reason: format!("package.json is not an object: {other}"),
            }),
            Err(e) => Err(Error::Metadata {
                path: path.clone(),
                reason: format!("invalid package.json: {e}"),
            }),
        }
    }
}

/// Reads the metadata of the application in `src`.
pub async fn read_metadata(src: &Path) -> Result<Map<String, Value>> {
    AppSource::probe(src).read().await
}

fn metadata_error(path: &Path, err: Error) -> Error {
    match err {
        Error::Metadata { .. } => err,
        other => Error::Metadata {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
