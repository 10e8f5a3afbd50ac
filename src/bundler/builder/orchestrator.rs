//! Main packaging orchestration.

use super::find_rpmbuild;
use crate::{
    bundler::{
        CollectedArtifact, PackageOptions, Result, StagingTree,
        artifacts::collect,
        assets::assemble,
        error::{Context, Stage, StageExt},
        rpmbuild::{self, Macros},
        settings::{UserOptions, resolve},
        template::Templates,
    },
    metadata::read_metadata,
};

/// Packaging pipeline orchestrator.
///
/// Runs each stage in order; the first failing stage aborts the run with an
/// error naming that stage. Nothing is retried. A missing rpmbuild is
/// reported before anything is staged.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_redhat::bundler::{Packager, UserOptions};
///
/// # async fn example() -> kodegen_bundler_redhat::bundler::Result<()> {
/// let packager = Packager::new(UserOptions {
///     src: Some("dist/demo-linux-x64".into()),
///     dest: Some("dist/installers".into()),
///     arch: Some("x86_64".into()),
///     ..Default::default()
/// })?;
///
/// let output = packager.package().await?;
/// for artifact in &output.artifacts {
///     println!("Created: {} ({} bytes)", artifact.path.display(), artifact.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Packager {
    user: UserOptions,
}

/// Result of a successful packaging run.
#[derive(Debug)]
pub struct PackageOutput {
    /// Options the package was built with.
    pub options: PackageOptions,
    /// Staging tree; removed when dropped unless kept.
    pub staging: StagingTree,
    /// Packages at their final destination.
    pub artifacts: Vec<CollectedArtifact>,
}

impl Packager {
    /// Creates a packager. `src` and `dest` are required.
    pub fn new(user: UserOptions) -> Result<Self> {
        user.src.as_ref().context("src is required")?;
        user.dest.as_ref().context("dest is required")?;
        Ok(Self { user })
    }

    /// Runs the full pipeline.
    pub async fn package(self) -> Result<PackageOutput> {
        let src = self.user.src.clone().unwrap_or_default();

        log::info!("Reading metadata from {}", src.display());
        let metadata = read_metadata(&src).await.stage(Stage::Metadata)?;
        let options = resolve(self.user, &metadata);
        log::info!(
            "Packaging {} {}-{} for {}",
            options.name,
            options.version,
            options.revision,
            options.arch
        );

        let templates = Templates::load(&options).await.stage(Stage::Templates)?;

        find_rpmbuild(&options.rpmbuild).stage(Stage::Build)?;

        let staging = StagingTree::create(&options)
            .await
            .stage(Stage::Staging)?;

        let macros = Macros::render(&templates, &options, &staging)
            .await
            .stage(Stage::Macros)?;

        assemble(&templates, &options, &staging)
            .await
            .stage(Stage::Assets)?;

        rpmbuild::build(&options, &staging, &macros)
            .await
            .stage(Stage::Build)?;

        let artifacts = collect(&templates, &options, &staging)
            .await
            .stage(Stage::Collect)?;

        Ok(PackageOutput {
            options,
            staging,
            artifacts,
        })
    }
}
