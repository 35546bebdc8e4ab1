//! YAML loading for run documents.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::RunConfig;

/// Read a run document from disk.
///
/// Relative paths inside the document are resolved against the directory that
/// contains it, so a run behaves the same regardless of the caller's cwd.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and
/// [`ConfigError::Parse`] when it is not a valid run document.
pub fn load_run_config(path: &Path) -> ConfigResult<RunConfig> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let config = parse_run_config(&raw, path, base)?;
    debug!(
        config = %path.display(),
        templates = config.templates.len(),
        "loaded run configuration"
    );
    Ok(config)
}

/// Parse a run document held in memory.
///
/// `origin` only labels errors; `base` anchors relative paths.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when `raw` is not a valid run document.
pub fn parse_run_config(raw: &str, origin: &Path, base: &Path) -> ConfigResult<RunConfig> {
    // An empty document deserialises to unit, not to the defaults.
    let mut config = if raw.trim().is_empty() {
        RunConfig::default()
    } else {
        serde_yaml::from_str::<RunConfig>(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?
    };
    config.resolve_relative_to(base);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineEnding, UnresolvedPolicy};
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn parse_applies_defaults_and_rebases() -> Result<(), Box<dyn Error>> {
        let raw = r"
output_directory: target/generated
properties:
  vendor: acme
templates:
  - source: templates/report.vm
    filter_set:
      directory: filters
      includes: ['*.properties']
";
        let config = parse_run_config(raw, Path::new("tessera.yaml"), Path::new("/project"))?;
        assert_eq!(
            config.output_directory,
            Some(PathBuf::from("/project/target/generated"))
        );
        assert!(config.inherit_environment);
        assert_eq!(config.properties.get("vendor").map(String::as_str), Some("acme"));

        let template = &config.templates[0];
        assert_eq!(
            template.source,
            Some(PathBuf::from("/project/templates/report.vm"))
        );
        assert_eq!(
            template.output_file_name_pattern,
            "@{filterBaseName}.@{sourceExtension}"
        );
        assert_eq!(template.line_ending, LineEnding::Keep);
        assert_eq!(template.content_indicator, '$');
        assert_eq!(template.name_indicator, '@');
        assert_eq!(template.unresolved, UnresolvedPolicy::Keep);
        let filter_set = template
            .filter_set
            .as_ref()
            .ok_or_else(|| std::io::Error::other("filter set missing"))?;
        assert_eq!(filter_set.includes, vec!["*.properties".to_string()]);
        assert!(filter_set.excludes.is_empty());
        assert!(filter_set.use_default_excludes);
        Ok(())
    }

    #[test]
    fn parse_reads_explicit_settings() -> Result<(), Box<dyn Error>> {
        let raw = r"
inherit_environment: false
templates:
  - source: greet.tmpl
    output_file_name_pattern: '@{filterBaseName}.txt'
    line_ending: dos
    content_indicator: '@'
    unresolved: fail
    filter_set:
      directory: filters
      use_default_excludes: false
";
        let config = parse_run_config(raw, Path::new("run.yaml"), Path::new(""))?;
        assert!(!config.inherit_environment);
        assert!(config.output_directory.is_none());
        let template = &config.templates[0];
        assert_eq!(template.line_ending, LineEnding::Dos);
        assert_eq!(template.content_indicator, '@');
        assert_eq!(template.unresolved, UnresolvedPolicy::Fail);
        assert_eq!(template.source, Some(PathBuf::from("greet.tmpl")));
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_fields_and_bad_enums() {
        let unknown = "templates:\n  - sauce: greet.tmpl\n";
        assert!(matches!(
            parse_run_config(unknown, Path::new("run.yaml"), Path::new("")),
            Err(ConfigError::Parse { .. })
        ));

        let bad_ending = "templates:\n  - source: a\n    line_ending: mac\n";
        assert!(matches!(
            parse_run_config(bad_ending, Path::new("run.yaml"), Path::new("")),
            Err(ConfigError::Parse { .. })
        ));

        let bad_policy = "templates:\n  - source: a\n    unresolved: drop\n";
        assert!(matches!(
            parse_run_config(bad_policy, Path::new("run.yaml"), Path::new("")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn empty_document_yields_defaults() -> Result<(), Box<dyn Error>> {
        let config = parse_run_config("  \n", Path::new("run.yaml"), Path::new(""))?;
        assert_eq!(config, RunConfig::default());
        Ok(())
    }

    #[test]
    fn load_reports_missing_file() {
        let missing = PathBuf::from("target/definitely-missing/tessera.yaml");
        assert!(matches!(
            load_run_config(&missing),
            Err(ConfigError::Io { operation: "read", .. })
        ));
    }
}
