//! Command line interface for the RPM bundler.
//!
//! Options come from an optional config file, overridden by flags, and are
//! handed to the [`Packager`](crate::bundler::Packager).

mod args;
pub mod config;

pub use args::Args;

use crate::bundler::{Packager, UserOptions};
use crate::error::{CliError, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    execute(Args::parse_args()).await
}

/// Runs the packager for already parsed arguments.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let file_options = match &args.config {
        Some(path) => config::load(path).await?,
        None => UserOptions::default(),
    };
    let user = absolutize_paths(file_options.merge(args.user_options()))?;

    if user.src.is_none() {
        return Err(CliError::InvalidArguments {
            reason: "--src is required (or set \"src\" in --config)".to_string(),
        }
        .into());
    }
    if user.dest.is_none() {
        return Err(CliError::InvalidArguments {
            reason: "--dest is required (or set \"dest\" in --config)".to_string(),
        }
        .into());
    }

    let output = Packager::new(user)?.package().await?;

    for artifact in &output.artifacts {
        println!(
            "Created {} ({} bytes, sha256 {})",
            artifact.path.display(),
            artifact.size,
            artifact.checksum
        );
    }

    if args.keep_staging {
        let staging = output.staging.keep();
        println!("Staging tree kept at {}", staging.display());
    }

    Ok(0)
}

fn absolutize_paths(mut user: UserOptions) -> Result<UserOptions> {
    user.src = user.src.as_deref().map(absolute).transpose()?;
    user.icon = user.icon.as_deref().map(absolute).transpose()?;
    user.dest = user
        .dest
        .as_deref()
        .map(|d| absolute(Path::new(d)).map(|p| p.to_string_lossy().into_owned()))
        .transpose()?;
    Ok(user)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}
