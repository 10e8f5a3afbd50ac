//! File system utilities for staging.
//!
//! Provides file operations with automatic directory creation,
//! symlink preservation, and path-aware errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Makes a symbolic link.
#[cfg(unix)]
pub async fn symlink(target: &Path, link: &Path) -> Result<()> {
    fs::symlink(target, link)
        .await
        .fs_context("creating symlink", link)
}

/// Makes a symbolic link.
#[cfg(windows)]
pub async fn symlink(target: &Path, link: &Path) -> Result<()> {
    fs::symlink_file(target, link)
        .await
        .fs_context("creating symlink", link)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from).await.fs_context("reading", from)?;
    if !metadata.is_file() {
        return Err(Error::GenericError(format!("{} is not a file", from.display())));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks. Fails if the source path is not a directory or doesn't
/// exist. Existing files at the destination are overwritten.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from).await.fs_context("reading", from)?;
    if !metadata.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&to).fs_context("creating directory", &to)?;

        for entry in walkdir::WalkDir::new(&from).min_depth(1) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                #[cfg(unix)]
                std::os::unix::fs::symlink(&target, &dest_path)
                    .fs_context("creating symlink", &dest_path)?;
                #[cfg(not(unix))]
                std::fs::copy(entry.path(), &dest_path).fs_context("copying to", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying to", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Moves a file, replacing any existing file at the destination.
///
/// The destination is only replaced once the new contents are complete; a
/// failed move leaves any existing file untouched. When source and
/// destination are on different filesystems the file is copied next to the
/// destination first and then renamed over it.
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(dest_dir) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }

    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            let partial = partial_path(to);
            if let Err(e) = fs::copy(from, &partial).await {
                let _ = fs::remove_file(&partial).await;
                return Err(e).fs_context("copying to", &partial);
            }
            if let Err(e) = fs::rename(&partial, to).await {
                let _ = fs::remove_file(&partial).await;
                return Err(e).fs_context("moving to", to);
            }
            fs::remove_file(from).await.fs_context("removing", from)
        }
        Err(e) => Err(e).fs_context("moving to", to),
    }
}

/// `<dir>/.<file name>.partial`, the scratch file for cross-device moves.
fn partial_path(to: &Path) -> PathBuf {
    let name = to
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    to.with_file_name(format!(".{name}.partial"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_dir_preserves_tree_and_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("resources/app")).unwrap();
        std::fs::write(src.join("demo"), b"#!/bin/sh\n").unwrap();
        std::fs::write(src.join("resources/app/package.json"), b"{}").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink("demo", src.join("demo-link")).unwrap();

        let dst = dir.path().join("out/share/demo");
        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read(dst.join("demo")).unwrap(), b"#!/bin/sh\n");
        assert!(dst.join("resources/app/package.json").is_file());
        #[cfg(unix)]
        assert_eq!(
            std::fs::read_link(dst.join("demo-link")).unwrap(),
            std::path::PathBuf::from("demo")
        );
    }

    #[tokio::test]
    async fn copy_dir_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_dir(&dir.path().join("nope"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fs { .. }));
    }

    #[tokio::test]
    async fn move_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.rpm");
        let to = dir.path().join("nested/b.rpm");
        std::fs::write(&from, b"new").unwrap();
        std::fs::create_dir_all(to.parent().unwrap()).unwrap();
        std::fs::write(&to, b"old").unwrap();

        move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"new");
    }

    #[tokio::test]
    async fn failed_move_keeps_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("demo.rpm");
        std::fs::write(&to, b"previous package").unwrap();

        let err = move_file(&dir.path().join("missing.rpm"), &to)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Fs { .. }));
        assert_eq!(std::fs::read(&to).unwrap(), b"previous package");
    }

    #[test]
    fn partial_file_sits_next_to_destination() {
        assert_eq!(
            partial_path(Path::new("/out/demo.rpm")),
            PathBuf::from("/out/.demo.rpm.partial")
        );
    }
}
