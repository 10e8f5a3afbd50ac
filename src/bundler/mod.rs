//! RPM packaging pipeline.
//!
//! Turns a packaged desktop application directory into `.rpm` files:
//! metadata is read from the application's `package.json`, merged with the
//! caller's options, staged into an rpmbuild top directory, built with
//! `rpmbuild`, and moved to the caller's destination.
//!
//! The entry point is [`Packager`].

pub mod artifacts;
pub mod assets;
pub mod builder;
pub mod error;
pub mod rpmbuild;
pub mod settings;
pub mod staging;
pub mod template;
pub mod utils;

pub use artifacts::CollectedArtifact;
pub use builder::{PackageOutput, Packager};
pub use error::{Error, Result, Stage};
pub use settings::{PackageOptions, Rename, UserOptions};
pub use staging::StagingTree;
