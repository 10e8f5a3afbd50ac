//! Filesystem and process helpers shared by the pipeline stages.

pub mod fs;
pub mod process;
