//! Packaging orchestration.
//!
//! This module provides the main [`Packager`] orchestrator that runs the
//! packaging pipeline end to end:
//!
//! 1. Reads `package.json` from the application
//! 2. Resolves [`PackageOptions`](crate::bundler::PackageOptions)
//! 3. Creates the staging tree and renders the rpmbuild macros
//! 4. Assembles the package contents
//! 5. Runs rpmbuild
//! 6. Moves the produced packages to their destination
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Packager`] struct
//! - [`tool_detection`] - rpmbuild availability checking

mod checksum;
mod orchestrator;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::{PackageOutput, Packager};
pub use tool_detection::find_rpmbuild;
