//! Error types for configuration loading and validation.
//!
//! Every variant here is fatal and raised before any output is written.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The run document lists no templates.
    #[error("at least one template must be specified")]
    NoTemplates,
    /// The run-wide default output directory is unset.
    #[error("missing run-wide output directory")]
    MissingOutputDirectory,
    /// A template entry has no source path.
    #[error("template #{index} is missing its source")]
    MissingSource {
        /// Zero-based position of the template in the document.
        index: usize,
    },
    /// A template source does not exist on disk.
    #[error("template source not found: {} (cwd={})", path.display(), cwd.display())]
    SourceNotFound {
        /// Missing source path.
        path: PathBuf,
        /// Working directory at validation time.
        cwd: PathBuf,
    },
    /// A template entry has no filter set.
    #[error("template {} is missing its filter set", template.display())]
    MissingFilterSet {
        /// Source path of the offending template.
        template: PathBuf,
    },
    /// A filter set directory does not exist on disk.
    #[error("filters directory not found: {} (cwd={})", path.display(), cwd.display())]
    FilterDirectoryNotFound {
        /// Missing filter directory.
        path: PathBuf,
        /// Working directory at validation time.
        cwd: PathBuf,
    },
    /// A placeholder indicator cannot be used.
    #[error("invalid {field} '{value}' for template {}", template.display())]
    InvalidIndicator {
        /// Source path of the offending template.
        template: PathBuf,
        /// Field carrying the indicator.
        field: &'static str,
        /// Offending indicator.
        value: char,
    },
    /// File system operation failed.
    #[error("failed to {operation} {}", path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The run document is not valid YAML or does not match the schema.
    #[error("failed to parse run configuration {}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Source YAML error.
        source: serde_yaml::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn yaml_error() -> serde_yaml::Error {
        match serde_yaml::from_str::<Vec<String>>("{ not: a list") {
            Ok(_) => unreachable!("malformed yaml parsed"),
            Err(err) => err,
        }
    }

    #[test]
    fn messages_name_the_offending_path() {
        let err = ConfigError::SourceNotFound {
            path: PathBuf::from("src/greet.tmpl"),
            cwd: PathBuf::from("/work"),
        };
        assert_eq!(
            err.to_string(),
            "template source not found: src/greet.tmpl (cwd=/work)"
        );

        let err = ConfigError::Io {
            operation: "read",
            path: PathBuf::from("tessera.yaml"),
            source: io::Error::other("io"),
        };
        assert_eq!(err.to_string(), "failed to read tessera.yaml");
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_errors_keep_their_source() {
        let err = ConfigError::Parse {
            path: PathBuf::from("tessera.yaml"),
            source: yaml_error(),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("tessera.yaml"));
    }
}
