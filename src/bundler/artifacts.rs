//! Artifact discovery and delivery.

use super::{
    PackageOptions, Result, StagingTree, builder::calculate_sha256, error::ErrorExt,
    template::Templates, utils::fs,
};
use crate::bail;
use std::{collections::HashSet, path::PathBuf};

/// A package moved to its final destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedArtifact {
    /// Destination path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// SHA-256 checksum (hex).
    pub checksum: String,
}

/// Moves every package rpmbuild produced for the target arch to its destination.
///
/// Each `RPMS/<arch>/*.rpm` is renamed through the options' rename policy, any
/// `{{option}}` references left in the result are rendered, and the file is
/// moved there, replacing an existing file. Two packages mapping to the same
/// destination fail the stage before anything is moved.
pub async fn collect(
    templates: &Templates,
    options: &PackageOptions,
    tree: &StagingTree,
) -> Result<Vec<CollectedArtifact>> {
    let pattern = tree.rpms_dir().join("*.rpm");
    let pattern = pattern.to_string_lossy();
    log::debug!("Scanning for artifacts: {}", pattern);

    let mut sources = Vec::new();
    for entry in glob::glob(&pattern)? {
        sources.push(entry?);
    }
    if sources.is_empty() {
        bail!("rpmbuild produced no packages in {}", tree.rpms_dir().display());
    }

    let mut moves = Vec::with_capacity(sources.len());
    let mut seen = HashSet::new();
    for source in sources {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dest = options.rename.apply(&options.dest, &file_name);
        let dest = PathBuf::from(templates.render_str(&dest, options)?);
        if !seen.insert(dest.clone()) {
            bail!(
                "{} and another package both map to {}; use a rename that includes the file name",
                source.display(),
                dest.display()
            );
        }
        moves.push((source, dest));
    }

    let mut artifacts = Vec::with_capacity(moves.len());
    for (source, dest) in moves {
        log::debug!("Moving {} to {}", source.display(), dest.display());
        fs::move_file(&source, &dest).await?;

        let size = tokio::fs::metadata(&dest)
            .await
            .fs_context("reading", &dest)?
            .len();
        let checksum = calculate_sha256(&dest).await?;
        log::info!("✓ Created package: {}", dest.display());

        artifacts.push(CollectedArtifact {
            path: dest,
            size,
            checksum,
        });
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{
        Error,
        settings::{Rename, UserOptions, resolve},
    };

    async fn staged(dest: String, rename: Option<Rename>) -> (PackageOptions, StagingTree) {
        let user = UserOptions {
            name: Some("demo".into()),
            version: Some("1.2.3".into()),
            arch: Some("x86_64".into()),
            dest: Some(dest),
            rename,
            ..Default::default()
        };
        let opts = resolve(user, &Default::default());
        let tree = StagingTree::create(&opts).await.unwrap();
        (opts, tree)
    }

    #[tokio::test]
    async fn renames_and_overwrites_every_artifact() {
        let out = tempfile::tempdir().unwrap();
        let dest = format!("{}/", out.path().display());
        let concat = Rename::new(|dest, name| format!("{dest}{name}"));
        let (opts, tree) = staged(dest.clone(), Some(concat)).await;

        std::fs::write(tree.rpms_dir().join("a.rpm"), b"package a").unwrap();
        std::fs::write(tree.rpms_dir().join("b.rpm"), b"package b").unwrap();
        std::fs::write(out.path().join("a.rpm"), b"stale").unwrap();

        let artifacts = collect(&Templates::new().unwrap(), &opts, &tree)
            .await
            .unwrap();

        let mut paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                PathBuf::from(format!("{dest}a.rpm")),
                PathBuf::from(format!("{dest}b.rpm"))
            ]
        );
        assert_eq!(std::fs::read(out.path().join("a.rpm")).unwrap(), b"package a");
        assert_eq!(std::fs::read(out.path().join("b.rpm")).unwrap(), b"package b");
        assert!(artifacts.iter().all(|a| a.size == 9 && a.checksum.len() == 64));
        assert_eq!(std::fs::read_dir(tree.rpms_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn default_rename_renders_options() {
        let out = tempfile::tempdir().unwrap();
        let (opts, tree) = staged(out.path().display().to_string(), None).await;
        std::fs::write(tree.rpms_dir().join("demo-1.2.3-1.fc40.x86_64.rpm"), b"rpm").unwrap();

        let artifacts = collect(&Templates::new().unwrap(), &opts, &tree)
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, out.path().join("demo-1.2.3-1.x86_64.rpm"));
        assert!(artifacts[0].path.is_file());
    }

    #[tokio::test]
    async fn empty_output_is_an_error() {
        let out = tempfile::tempdir().unwrap();
        let (opts, tree) = staged(out.path().display().to_string(), None).await;

        let err = collect(&Templates::new().unwrap(), &opts, &tree)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GenericError(_)));
    }

    #[tokio::test]
    async fn colliding_destinations_fail_before_moving() {
        let out = tempfile::tempdir().unwrap();
        let (opts, tree) = staged(out.path().display().to_string(), None).await;
        let main = tree.rpms_dir().join("demo-1.2.3-1.x86_64.rpm");
        let debug = tree.rpms_dir().join("demo-debuginfo-1.2.3-1.x86_64.rpm");
        std::fs::write(&main, b"main").unwrap();
        std::fs::write(&debug, b"debug").unwrap();

        let err = collect(&Templates::new().unwrap(), &opts, &tree)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("both map to"), "{err}");
        assert!(main.is_file());
        assert!(debug.is_file());
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
