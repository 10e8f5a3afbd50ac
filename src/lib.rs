//! RPM installer bundler for packaged desktop applications.
//!
//! Reads application metadata from `resources/app.asar` or
//! `resources/app/package.json`, stages the application into an rpmbuild
//! tree, runs `rpmbuild`, and moves the resulting `.rpm` files to a
//! destination directory.
//!
//! It can be used both as a CLI tool and as a library dependency; see
//! [`bundler::Packager`].

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{AppError, CliError, Result};
