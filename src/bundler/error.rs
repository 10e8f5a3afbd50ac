//! Error types for the packaging pipeline.
//!
//! Every pipeline stage wraps its underlying cause in [`Error::Stage`] so the
//! final message names the stage that failed, followed by the original cause.

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage, used to label wrapped errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading `package.json` from the application.
    Metadata,
    /// Loading the spec and desktop templates.
    Templates,
    /// Allocating and laying out the staging tree.
    Staging,
    /// Rendering the rpmbuild macros.
    Macros,
    /// Populating the staging tree.
    Assets,
    /// Running rpmbuild.
    Build,
    /// Moving artifacts to their destination.
    Collect,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Metadata => "reading application metadata",
            Stage::Templates => "loading templates",
            Stage::Staging => "creating staging tree",
            Stage::Macros => "rendering rpmbuild macros",
            Stage::Assets => "assembling package contents",
            Stage::Build => "building package",
            Stage::Collect => "collecting artifacts",
        };
        f.write_str(label)
    }
}

/// How an external process ended when it did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The process could not be spawned or waited on.
    NotStarted,
    /// The process exited with a nonzero code.
    ExitCode(i32),
    /// The process was killed by a signal.
    Signal(i32),
}

impl Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NotStarted => f.write_str("process did not start"),
            Termination::ExitCode(code) => write!(f, "exit code {code}"),
            Termination::Signal(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}

/// Main error type for bundler operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Error while running a pipeline stage.
    #[error("error {stage}: {source}")]
    Stage {
        /// Stage that failed
        stage: Stage,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Application metadata could not be read or parsed.
    #[error("failed to read metadata from {}: {reason}", path.display())]
    Metadata {
        /// Archive or descriptor path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Template could not be registered or rendered.
    #[error("failed to render {name} template: {reason}")]
    Template {
        /// Template name
        name: String,
        /// Underlying cause
        reason: String,
    },

    /// One of the staging-tree population tasks failed.
    #[error("{task}: {source}")]
    Asset {
        /// Sub-task that failed
        task: &'static str,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// External command failed.
    #[error("{}", format_process_error(command, termination, stderr, source.as_ref()))]
    Process {
        /// Full command line
        command: String,
        /// How the process ended
        termination: Termination,
        /// Captured diagnostic output
        stderr: String,
        /// Spawn or wait error, if any
        #[source]
        source: Option<std::io::Error>,
    },

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Glob enumeration failed.
    #[error("glob enumeration failed: {0}")]
    Glob(#[from] glob::GlobError),

    /// IO errors.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// JSON errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix errors.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Generic error with message.
    #[error("{0}")]
    GenericError(String),
}

fn format_process_error(
    command: &str,
    termination: &Termination,
    stderr: &str,
    source: Option<&std::io::Error>,
) -> String {
    let mut message = match source {
        Some(err) => format!("command `{command}` failed: {err} ({termination})"),
        None => format!("command `{command}` failed with {termination}"),
    };
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        message.push('\n');
        message.push_str(stderr);
    }
    message
}

impl Error {
    /// Returns the innermost stage label, if this error was raised by a pipeline stage.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Convenience trait for converting `Option` and `Result` values into bundler errors.
pub trait Context<T> {
    /// Converts to an [`Error::GenericError`] with the given message.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Extension trait attaching path context to I/O results and stage labels to
/// bundler results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with what was being done and the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Labels a bundler result with the pipeline stage that produced it.
pub trait StageExt<T> {
    /// Wraps an error in [`Error::Stage`].
    fn stage(self, stage: Stage) -> Result<T>;

    /// Wraps an error in [`Error::Asset`].
    fn task(self, task: &'static str) -> Result<T>;
}

impl<T> StageExt<T> for Result<T> {
    fn stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| Error::Stage {
            stage,
            source: Box::new(e),
        })
    }

    fn task(self, task: &'static str) -> Result<T> {
        self.map_err(|e| Error::Asset {
            task,
            source: Box::new(e),
        })
    }
}

/// Returns early with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
