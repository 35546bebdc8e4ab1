//! Error types for template expansion.
//!
//! Every variant except [`EngineError::Config`] is raised while a template is
//! executing and stops the run. Messages always name the file involved.

use std::io;
use std::path::PathBuf;

use tessera_config::ConfigError;
use tessera_fsops::FsOpsError;
use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while running a batch.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The run configuration failed validation; nothing was written.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The filter directory vanished between validation and execution.
    #[error("filter directory does not exist: {}", path.display())]
    FilterDirectoryMissing {
        /// Missing directory.
        path: PathBuf,
    },
    /// The filter set could not be resolved.
    #[error("failed to enumerate filter files in {}", directory.display())]
    Enumerate {
        /// Filter directory.
        directory: PathBuf,
        /// Underlying enumeration error.
        source: FsOpsError,
    },
    /// The source template could not be read.
    #[error("failed to read template {}", path.display())]
    ReadSource {
        /// Template path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// A filter property file could not be read.
    #[error("failed to read filter file {}", path.display())]
    ReadFilter {
        /// Filter path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// An output directory could not be created.
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// An output file could not be written.
    #[error("error creating file {}", path.display())]
    WriteOutput {
        /// Output path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// A content placeholder had no value under the `fail` policy.
    #[error(
        "no value for placeholder '{key}' in {} (filter {})",
        template.display(),
        filter.display()
    )]
    UnresolvedPlaceholder {
        /// Key without a value.
        key: String,
        /// Template being expanded.
        template: PathBuf,
        /// Filter file supplying the properties.
        filter: PathBuf,
    },
    /// The expanded output name would leave the output directory.
    #[error("output name '{name}' for filter {} escapes the output directory", filter.display())]
    InvalidOutputName {
        /// Expanded name.
        name: String,
        /// Filter file the name was expanded for.
        filter: PathBuf,
    },
}

impl EngineError {
    /// Whether the error was raised by the validation pass, before any IO.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub(crate) fn from_enumeration(directory: PathBuf, source: FsOpsError) -> Self {
        match source {
            FsOpsError::DirectoryMissing { path } => Self::FilterDirectoryMissing { path },
            source => Self::Enumerate { directory, source },
        }
    }
}
