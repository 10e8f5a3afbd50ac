//! Minimal asar archive reader.
//!
//! Only what is needed to pull a single file out of `app.asar`:
//!
//! ```text
//! [u32 le: 4][u32 le: header_size]          size pickle
//! [u32 le: payload][u32 le: json_len][json] header pickle (header_size bytes)
//! [file data...]                            starts at 8 + header_size
//! ```
//!
//! The JSON index nests directories under `files` keys. File entries carry a
//! `size` and a string `offset` relative to the start of the file data, or
//! `"unpacked": true` when the file lives in `app.asar.unpacked/`.

use crate::bundler::{Error, Result, error::ErrorExt};
use serde_json::Value;
use std::{
    io::SeekFrom,
    path::{Path, PathBuf},
};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Upper bound on the JSON index size, guards against reading garbage as a length.
const MAX_HEADER_SIZE: u32 = 64 * 1024 * 1024;

/// Reads the file at `entry` (slash-separated) from the asar archive at `archive`.
pub async fn read_file(archive: &Path, entry: &str) -> Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(archive)
        .await
        .fs_context("opening archive", archive)?;

    let mut prefix = [0u8; 16];
    file.read_exact(&mut prefix)
        .await
        .fs_context("reading archive header", archive)?;

    let header_size = le_u32(&prefix[4..8]);
    let json_len = le_u32(&prefix[12..16]);
    if json_len > MAX_HEADER_SIZE || json_len > header_size {
        return Err(malformed(archive, "header length out of range"));
    }

    let mut json = vec![0u8; json_len as usize];
    file.read_exact(&mut json)
        .await
        .fs_context("reading archive index", archive)?;
    let index: Value = serde_json::from_slice(&json)?;

    let node = lookup(&index, entry).ok_or_else(|| Error::Metadata {
        path: archive.to_path_buf(),
        reason: format!("{entry} not found in archive"),
    })?;

    if node.get("unpacked").and_then(Value::as_bool).unwrap_or(false) {
        let unpacked = unpacked_path(archive, entry);
        return tokio::fs::read(&unpacked)
            .await
            .fs_context("reading unpacked archive entry", &unpacked);
    }

    let size = node
        .get("size")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed(archive, "entry has no size"))?;
    let offset = node
        .get("offset")
        .and_then(|v| v.as_str().and_then(|s| s.parse::<u64>().ok()).or(v.as_u64()))
        .ok_or_else(|| malformed(archive, "entry has no offset"))?;

    let data_start = 8 + u64::from(header_size);
    let archive_len = file
        .metadata()
        .await
        .fs_context("reading archive metadata", archive)?
        .len();
    let in_bounds = data_start
        .checked_add(offset)
        .and_then(|start| start.checked_add(size))
        .is_some_and(|end| end <= archive_len);
    if !in_bounds {
        return Err(malformed(archive, "entry extends past end of archive"));
    }

    file.seek(SeekFrom::Start(data_start + offset))
        .await
        .fs_context("seeking archive entry", archive)?;

    let mut data = vec![0u8; size as usize];
    file.read_exact(&mut data)
        .await
        .fs_context("reading archive entry", archive)?;
    Ok(data)
}

fn lookup<'a>(index: &'a Value, entry: &str) -> Option<&'a Value> {
    entry
        .split('/')
        .filter(|part| !part.is_empty())
        .try_fold(index, |node, part| node.get("files")?.get(part))
}

fn unpacked_path(archive: &Path, entry: &str) -> PathBuf {
    let mut dir = archive.as_os_str().to_owned();
    dir.push(".unpacked");
    entry
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(PathBuf::from(dir), |path, part| path.join(part))
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn malformed(archive: &Path, reason: &str) -> Error {
    Error::Metadata {
        path: archive.to_path_buf(),
        reason: format!("malformed archive: {reason}"),
    }
}

/// Builds an asar archive in memory. Test helper.
#[cfg(test)]
pub(crate) fn pack(files: &[(&str, &[u8])]) -> Vec<u8> {
    use serde_json::{Map, json};

    let mut root = Map::new();
    let mut data = Vec::new();
    for (name, contents) in files {
        root.insert(
            (*name).to_string(),
            json!({ "size": contents.len(), "offset": data.len().to_string() }),
        );
        data.extend_from_slice(contents);
    }
    let json = serde_json::to_vec(&json!({ "files": root })).unwrap();
    frame(&json, &data)
}

/// Lays out `index` and `data` in archive order. Test helper.
#[cfg(test)]
fn frame(index: &[u8], data: &[u8]) -> Vec<u8> {
    let padded = (index.len() + 3) & !3;
    let header_size = (8 + padded) as u32;
    let mut out = Vec::new();
    out.extend_from_slice(&4u32.to_le_bytes());
    out.extend_from_slice(&header_size.to_le_bytes());
    out.extend_from_slice(&((4 + padded) as u32).to_le_bytes());
    out.extend_from_slice(&(index.len() as u32).to_le_bytes());
    out.extend_from_slice(index);
    out.resize(8 + header_size as usize, 0);
    out.extend_from_slice(data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_packed_entry() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.asar");
        let bytes = pack(&[
            ("index.js", b"console.log('hi')".as_slice()),
            ("package.json", br#"{"name":"demo"}"#.as_slice()),
        ]);
        std::fs::write(&archive, bytes).unwrap();

        let data = read_file(&archive, "package.json").await.unwrap();
        assert_eq!(data, br#"{"name":"demo"}"#);
    }

    #[tokio::test]
    async fn missing_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.asar");
        std::fs::write(&archive, pack(&[("index.js", b"".as_slice())])).unwrap();

        let err = read_file(&archive, "package.json").await.unwrap_err();
        assert!(err.to_string().contains("package.json not found"));
    }

    #[tokio::test]
    async fn truncated_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.asar");
        std::fs::write(&archive, [4u8, 0, 0]).unwrap();

        assert!(read_file(&archive, "package.json").await.is_err());
    }

    #[tokio::test]
    async fn reads_unpacked_entry() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.asar");
        let index = br#"{"files":{"package.json":{"size":15,"unpacked":true}}}"#;
        std::fs::write(&archive, frame(index, b"")).unwrap();
        std::fs::create_dir_all(dir.path().join("app.asar.unpacked")).unwrap();
        std::fs::write(
            dir.path().join("app.asar.unpacked/package.json"),
            br#"{"name":"demo"}"#,
        )
        .unwrap();

        let data = read_file(&archive, "package.json").await.unwrap();
        assert_eq!(data, br#"{"name":"demo"}"#);
    }

    #[tokio::test]
    async fn oversized_entry_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.asar");
        let index = br#"{"files":{"package.json":{"size":4000000000,"offset":"0"}}}"#;
        std::fs::write(&archive, frame(index, b"{}")).unwrap();

        let err = read_file(&archive, "package.json").await.unwrap_err();
        assert!(err.to_string().contains("past end of archive"), "{err}");
    }
}
