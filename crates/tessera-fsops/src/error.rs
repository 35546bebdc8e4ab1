//! # Design
//!
//! - Structured errors for filter set resolution.
//! - Every variant names the directory or pattern involved.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for filter enumeration.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while resolving a filter set.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// The filter directory does not exist at enumeration time.
    #[error("filter directory does not exist: {}", path.display())]
    DirectoryMissing {
        /// Missing directory.
        path: PathBuf,
    },
    /// Walkdir traversal failures.
    #[error("failed to scan filter directory {}", path.display())]
    Walkdir {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// Globset compilation failures.
    #[error("invalid glob pattern '{pattern}'")]
    Glob {
        /// Glob pattern that failed to compile.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },
    /// Pattern rejected before compilation.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
}

impl FsOpsError {
    pub(crate) fn walkdir(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Walkdir {
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn glob(pattern: String, source: globset::Error) -> Self {
        Self::Glob { pattern, source }
    }
}
