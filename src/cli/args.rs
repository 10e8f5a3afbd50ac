//! Command line argument parsing and validation.

use crate::bundler::UserOptions;
use clap::Parser;
use std::path::PathBuf;

/// RPM package bundler for packaged desktop applications
#[derive(Parser, Debug, Default)]
#[command(
    name = "kodegen_bundler_redhat",
    version,
    about = "RPM package bundler for packaged desktop applications",
    long_about = "Creates .rpm packages from a packaged desktop application directory.

Reads package.json from resources/app.asar or resources/app/, stages the
application into an rpmbuild tree, runs rpmbuild, and moves the package to --dest.

Usage:
  kodegen_bundler_redhat --src dist/demo-linux-x64 --dest dist/installers --arch x86_64
  kodegen_bundler_redhat --src dist/demo-linux-x64 --dest dist/installers --config rpm.json

Exit code 0 = package guaranteed to exist at the printed path."
)]
pub struct Args {
    /// Directory containing the packaged application
    #[arg(short = 's', long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Destination directory for the package
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dest: Option<String>,

    /// Target architecture (x86_64, aarch64, x64, arm64, ...)
    #[arg(short, long)]
    pub arch: Option<String>,

    /// JSON or TOML file with packaging options (camelCase keys)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package name
    #[arg(long)]
    pub name: Option<String>,

    /// Human readable application name
    #[arg(long)]
    pub product_name: Option<String>,

    /// Generic application name for the desktop entry
    #[arg(long)]
    pub generic_name: Option<String>,

    /// Short description (RPM Summary)
    #[arg(long)]
    pub description: Option<String>,

    /// Long description (RPM %description)
    #[arg(long)]
    pub product_description: Option<String>,

    /// Package version
    #[arg(long, value_name = "VERSION")]
    pub version_string: Option<String>,

    /// Package release number
    #[arg(long)]
    pub revision: Option<String>,

    /// License identifier
    #[arg(long)]
    pub license: Option<String>,

    /// Project homepage
    #[arg(long)]
    pub homepage: Option<String>,

    /// Executable name inside the application directory
    #[arg(long)]
    pub bin: Option<String>,

    /// Icon installed to /usr/share/pixmaps
    #[arg(long, value_name = "FILE")]
    pub icon: Option<PathBuf>,

    /// Runtime dependency (repeatable)
    #[arg(long = "requires", value_name = "PACKAGE")]
    pub requires: Vec<String>,

    /// Desktop menu category (repeatable)
    #[arg(long = "categories", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Custom Handlebars spec template
    #[arg(long, value_name = "FILE")]
    pub spec_template: Option<PathBuf>,

    /// Custom Handlebars desktop entry template
    #[arg(long, value_name = "FILE")]
    pub desktop_template: Option<PathBuf>,

    /// rpmbuild executable
    #[arg(long, env = "RPMBUILD", value_name = "PATH")]
    pub rpmbuild: Option<PathBuf>,

    /// Keep the staging tree after packaging
    #[arg(long)]
    pub keep_staging: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.arch.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err("Architecture cannot be empty".to_string());
        }
        if self.requires.iter().any(|r| r.trim().is_empty()) {
            return Err("--requires values cannot be empty".to_string());
        }
        Ok(())
    }

    /// Options given on the command line. Unset flags stay `None`.
    pub fn user_options(&self) -> UserOptions {
        let non_empty = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        UserOptions {
            src: self.src.clone(),
            dest: self.dest.clone(),
            name: self.name.clone(),
            product_name: self.product_name.clone(),
            generic_name: self.generic_name.clone(),
            description: self.description.clone(),
            product_description: self.product_description.clone(),
            version: self.version_string.clone(),
            revision: self.revision.clone(),
            license: self.license.clone(),
            homepage: self.homepage.clone(),
            arch: self.arch.clone(),
            requires: non_empty(&self.requires),
            categories: non_empty(&self.categories),
            bin: self.bin.clone(),
            icon: self.icon.clone(),
            spec_template: self.spec_template.clone(),
            desktop_template: self.desktop_template.clone(),
            rpmbuild: self.rpmbuild.clone(),
            rename: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeatable_lists() {
        let args = Args::try_parse_from([
            "kodegen_bundler_redhat",
            "--src",
            "dist/app",
            "--dest",
            "out",
            "--requires",
            "lsb",
            "--requires",
            "libnotify",
            "--version-string",
            "2.0.0",
        ])
        .unwrap();
        let opts = args.user_options();
        assert_eq!(opts.requires, Some(vec!["lsb".into(), "libnotify".into()]));
        assert_eq!(opts.categories, None);
        assert_eq!(opts.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn rejects_blank_arch() {
        let args = Args {
            arch: Some(" ".into()),
            ..Default::default()
        };
        assert!(args.validate().is_err());
    }
}
