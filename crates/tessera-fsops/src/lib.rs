//! Filter file enumeration: resolves a [`FilterSet`] into the files it selects.
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::redundant_pub_crate)]

use std::path::PathBuf;

use tessera_config::FilterSet;

pub mod error;
mod rules;
mod scan;

pub use error::{FsOpsError, FsOpsResult};
pub use scan::GlobEnumerator;

/// Patterns excluded from every filter set unless `use_default_excludes` is off.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    "**/CVS/**",
    "**/.cvsignore",
    "**/.svn/**",
    "**/.git/**",
    "**/.gitignore",
    "**/.gitattributes",
    "**/.hg/**",
    "**/.hgignore",
    "**/.bzr/**",
    "**/.DS_Store",
];

/// Resolves a filter set into concrete filter file paths.
pub trait FileEnumerator {
    /// Return the selected files, each joined onto the filter set directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::DirectoryMissing`] when the directory is absent at
    /// call time, or a glob/walk error when the set cannot be resolved.
    fn enumerate(&self, filter_set: &FilterSet) -> FsOpsResult<Vec<PathBuf>>;
}
