//! Packaging options: caller input, metadata-derived defaults, and the
//! resolved record every pipeline stage reads.

mod arch;
mod options;
mod resolve;
mod user;
mod wrap;

pub use arch::{host_arch, rpm_arch};
pub use options::PackageOptions;
pub use resolve::{
    DEFAULT_CATEGORIES, DEFAULT_LICENSE, DEFAULT_NAME, DEFAULT_REQUIRES, DEFAULT_REVISION,
    DEFAULT_VERSION, resolve,
};
pub use user::{Rename, UserOptions};
pub use wrap::{DESCRIPTION_WIDTH, wrap};
