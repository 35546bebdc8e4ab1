//! Up-front validation of a run document.
//!
//! # Design
//! - Runs before any file is touched; every failure aborts the whole run.
//! - Converts the loose document into a [`RunPlan`] so later stages never
//!   re-check required fields.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{RunConfig, RunPlan, TemplateConfig, TemplateSpec};

impl RunConfig {
    /// Validate the document and produce an executable plan.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: no templates, no run-wide
    /// output directory, then per template a missing or absent source, a
    /// missing filter set or filter directory, or an unusable indicator.
    pub fn validate(self) -> ConfigResult<RunPlan> {
        if self.templates.is_empty() {
            return Err(ConfigError::NoTemplates);
        }
        let output_directory = self
            .output_directory
            .ok_or(ConfigError::MissingOutputDirectory)?;

        let cwd = current_dir();
        let templates = self
            .templates
            .into_iter()
            .enumerate()
            .map(|(index, template)| validate_template(index, template, &cwd))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(RunPlan {
            output_directory,
            properties: self.properties,
            inherit_environment: self.inherit_environment,
            templates,
        })
    }
}

fn validate_template(
    index: usize,
    template: TemplateConfig,
    cwd: &Path,
) -> ConfigResult<TemplateSpec> {
    let source = template
        .source
        .ok_or(ConfigError::MissingSource { index })?;
    if !source.exists() {
        return Err(ConfigError::SourceNotFound {
            path: source,
            cwd: cwd.to_path_buf(),
        });
    }

    let Some(filter_set) = template.filter_set else {
        return Err(ConfigError::MissingFilterSet { template: source });
    };
    if !filter_set.directory.exists() {
        return Err(ConfigError::FilterDirectoryNotFound {
            path: filter_set.directory,
            cwd: cwd.to_path_buf(),
        });
    }

    check_indicator(&source, "content_indicator", template.content_indicator)?;
    check_indicator(&source, "name_indicator", template.name_indicator)?;

    Ok(TemplateSpec {
        source,
        output_directory: template.output_directory,
        output_file_name_pattern: template.output_file_name_pattern,
        filter_set,
        line_ending: template.line_ending,
        content_indicator: template.content_indicator,
        name_indicator: template.name_indicator,
        unresolved: template.unresolved,
    })
}

/// Indicators must be ASCII punctuation that cannot be confused with braces.
fn check_indicator(template: &Path, field: &'static str, value: char) -> ConfigResult<()> {
    if value.is_ascii_punctuation() && !matches!(value, '{' | '}' | '_') {
        return Ok(());
    }
    Err(ConfigError::InvalidIndicator {
        template: template.to_path_buf(),
        field,
        value,
    })
}

fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
