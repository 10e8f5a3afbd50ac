//! rpmbuild invocation.
//!
//! Macros that point rpmbuild at the staging tree are passed as `--define`
//! arguments of this invocation only. Nothing is written to `~/.rpmmacros`,
//! so concurrent runs cannot see each other's `%_topdir`.

use super::{
    PackageOptions, Result, StagingTree,
    error::ErrorExt,
    template::{TemplateKind, Templates},
    utils::process,
};
use serde_json::Value;
use std::ffi::OsString;

/// Macro definitions rendered for one staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macros {
    definitions: Vec<(String, String)>,
}

impl Macros {
    /// Renders the macros template for `tree` and keeps a copy inside it.
    pub async fn render(
        templates: &Templates,
        options: &PackageOptions,
        tree: &StagingTree,
    ) -> Result<Self> {
        let staging_dir = Value::String(tree.root().to_string_lossy().into_owned());
        let text = templates.render(TemplateKind::Macros, options, &[("stagingDir", staging_dir)])?;

        let path = tree.macros_path();
        tokio::fs::write(&path, &text)
            .await
            .fs_context("writing macros", &path)?;

        Ok(Self::parse(&text))
    }

    /// Parses `%name value` lines; comments and blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        let definitions = text
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix('%'))
            .filter_map(|line| {
                let (name, value) = line.split_once(char::is_whitespace)?;
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { definitions }
    }

    /// `--define "name value"` argument pairs.
    pub fn to_args(&self) -> Vec<OsString> {
        self.definitions
            .iter()
            .flat_map(|(name, value)| {
                [
                    OsString::from("--define"),
                    OsString::from(format!("{name} {value}")),
                ]
            })
            .collect()
    }
}

/// Builds the binary package from the staged spec file.
///
/// Runs `rpmbuild -bb <spec> --target <arch>` with the macro definitions.
pub async fn build(options: &PackageOptions, tree: &StagingTree, macros: &Macros) -> Result<()> {
    let spec = tree.spec_path();
    log::info!(
        "Running {} for {} ({})",
        options.rpmbuild.display(),
        options.name,
        options.arch
    );

    let mut args: Vec<OsString> = vec!["-bb".into(), spec.into_os_string()];
    args.push("--target".into());
    args.push(options.arch.clone().into());
    args.extend(macros.to_args());

    process::run(&options.rpmbuild, &args).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definitions() {
        let macros = Macros::parse("# comment\n%_topdir /tmp/demo tree\n\n%_tmppath /tmp\n");
        assert_eq!(
            macros.to_args(),
            vec![
                OsString::from("--define"),
                OsString::from("_topdir /tmp/demo tree"),
                OsString::from("--define"),
                OsString::from("_tmppath /tmp"),
            ]
        );
    }
}
