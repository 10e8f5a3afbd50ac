//! Staging tree population.
//!
//! Six independent tasks, each writing to its own part of the tree, run
//! concurrently. The first failure aborts the stage; whatever sibling tasks
//! already wrote stays in the tree, which is discarded as a whole.

use super::{
    PackageOptions, Result, StagingTree,
    error::{ErrorExt, StageExt},
    template::{TemplateKind, Templates},
    utils::fs,
};
use serde_json::Value;
use std::path::PathBuf;

/// Icon installed when the application provides none.
const DEFAULT_ICON: &[u8] = include_bytes!("../../resources/icon.png");

/// Populates `tree` with everything the spec file's `%files` section lists.
pub async fn assemble(
    templates: &Templates,
    options: &PackageOptions,
    tree: &StagingTree,
) -> Result<()> {
    log::info!("Assembling package contents for {}", options.name);

    tokio::try_join!(
        async { write_spec(templates, options, tree).await.task("spec file") },
        async { link_binary(options, tree).await.task("binary link") },
        async { write_desktop(templates, options, tree).await.task("desktop entry") },
        async { copy_icon(options, tree).await.task("icon") },
        async { write_copyright(options, tree).await.task("copyright") },
        async { copy_application(options, tree).await.task("application") },
    )?;

    Ok(())
}

async fn write_spec(
    templates: &Templates,
    options: &PackageOptions,
    tree: &StagingTree,
) -> Result<()> {
    let staging_dir = Value::String(tree.root().to_string_lossy().into_owned());
    let spec = templates.render(TemplateKind::Spec, options, &[("stagingDir", staging_dir)])?;
    let path = tree.spec_path();
    log::debug!("Writing spec file {}", path.display());
    tokio::fs::write(&path, spec)
        .await
        .fs_context("writing spec file", &path)
}

/// `/usr/bin/<name>` points into the payload at `../share/<name>/<bin>`.
async fn link_binary(options: &PackageOptions, tree: &StagingTree) -> Result<()> {
    let bin_dir = tree.bin_dir();
    tokio::fs::create_dir_all(&bin_dir)
        .await
        .fs_context("creating directory", &bin_dir)?;

    let target = PathBuf::from("..")
        .join("share")
        .join(&options.name)
        .join(&options.bin);
    let link = bin_dir.join(&options.name);
    log::debug!("Linking {} -> {}", link.display(), target.display());
    fs::symlink(&target, &link).await
}

async fn write_desktop(
    templates: &Templates,
    options: &PackageOptions,
    tree: &StagingTree,
) -> Result<()> {
    let desktop = templates.render(TemplateKind::Desktop, options, &[])?;
    let path = tree
        .applications_dir()
        .join(format!("{}.desktop", options.name));
    tokio::fs::write(&path, desktop)
        .await
        .fs_context("writing desktop entry", &path)
}

async fn copy_icon(options: &PackageOptions, tree: &StagingTree) -> Result<()> {
    let dest = tree.pixmaps_dir().join(format!("{}.png", options.name));
    match &options.icon {
        Some(icon) => fs::copy_file(icon, &dest).await,
        None => {
            log::warn!("No icon configured, installing the default icon");
            tokio::fs::write(&dest, DEFAULT_ICON)
                .await
                .fs_context("writing icon", &dest)
        }
    }
}

async fn write_copyright(options: &PackageOptions, tree: &StagingTree) -> Result<()> {
    let license = options.license_path();
    let text = tokio::fs::read(&license)
        .await
        .fs_context("reading license", &license)?;
    let dest = tree.doc_dir().join("copyright");
    tokio::fs::write(&dest, text)
        .await
        .fs_context("writing copyright", &dest)
}

async fn copy_application(options: &PackageOptions, tree: &StagingTree) -> Result<()> {
    log::debug!(
        "Copying {} into {}",
        options.src.display(),
        tree.app_dir().display()
    );
    fs::copy_dir(&options.src, &tree.app_dir()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{
        Error,
        settings::{UserOptions, resolve},
    };

    fn app(dir: &std::path::Path) -> PathBuf {
        let src = dir.join("demo-linux-x64");
        std::fs::create_dir_all(src.join("resources/app")).unwrap();
        std::fs::write(src.join("demo"), b"#!/bin/sh\n").unwrap();
        std::fs::write(src.join("LICENSE"), b"MIT License\n").unwrap();
        std::fs::write(src.join("resources/app/package.json"), b"{}").unwrap();
        src
    }

    fn options(src: PathBuf) -> PackageOptions {
        let user = UserOptions {
            src: Some(src),
            name: Some("demo".into()),
            version: Some("1.2.3".into()),
            arch: Some("x86_64".into()),
            ..Default::default()
        };
        resolve(user, &Default::default())
    }

    #[tokio::test]
    async fn populates_every_asset() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(app(dir.path()));
        let tree = StagingTree::create(&opts).await.unwrap();
        let templates = Templates::new().unwrap();

        assemble(&templates, &opts, &tree).await.unwrap();

        let spec = std::fs::read_to_string(tree.spec_path()).unwrap();
        assert!(spec.contains("Name: demo"));
        assert_eq!(
            std::fs::read_link(tree.bin_dir().join("demo")).unwrap(),
            PathBuf::from("../share/demo/demo")
        );
        assert!(tree.bin_dir().join("demo").exists());
        assert!(tree.applications_dir().join("demo.desktop").is_file());
        assert_eq!(
            std::fs::read(tree.pixmaps_dir().join("demo.png")).unwrap(),
            DEFAULT_ICON
        );
        assert_eq!(
            std::fs::read(tree.doc_dir().join("copyright")).unwrap(),
            b"MIT License\n"
        );
        assert!(tree.app_dir().join("resources/app/package.json").is_file());
    }

    #[tokio::test]
    async fn one_failing_task_fails_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let src = app(dir.path());
        std::fs::remove_file(src.join("LICENSE")).unwrap();
        let opts = options(src);
        let tree = StagingTree::create(&opts).await.unwrap();

        let err = assemble(&Templates::new().unwrap(), &opts, &tree)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Asset { task: "copyright", .. }));
        assert!(err.to_string().contains("LICENSE"));
    }

    #[tokio::test]
    async fn missing_icon_fails_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(app(dir.path()));
        opts.icon = Some(dir.path().join("nope.png"));
        let tree = StagingTree::create(&opts).await.unwrap();

        let err = assemble(&Templates::new().unwrap(), &opts, &tree)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Asset { task: "icon", .. }));
    }
}
