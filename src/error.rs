//! Top-level error types for the command line tool.
//!
//! Pipeline failures arrive as [`bundler::Error`](crate::bundler::Error) and
//! already name the stage that failed; this layer adds argument and
//! configuration-file errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum AppError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Packaging pipeline errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Invalid config file {}: {reason}", path.display())]
    InvalidConfig {
        /// Config file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}
