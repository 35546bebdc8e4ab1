//! Expansion of one template against every file of its filter set.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tessera_config::TemplateSpec;
use tessera_fsops::FileEnumerator;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::expand::{Expander, NameExpander, UnresolvedKey};
use crate::line_ending::normalize_line_endings;
use crate::properties::{PropertyBag, load_properties};

/// Content and destination produced for one filter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionResult {
    /// Destination file.
    pub path: PathBuf,
    /// Expanded, normalised content.
    pub content: String,
}

impl ExpansionResult {
    /// Write the content, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CreateDir`] or [`EngineError::WriteOutput`]
    /// naming the path that failed.
    pub fn write(&self) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| EngineError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let write_err = |source| EngineError::WriteOutput {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(write_err)?;
        file.write_all(self.content.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)
    }
}

/// Outcome of one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateReport {
    /// Source template.
    pub source: PathBuf,
    /// True when the source was missing at execution time.
    pub skipped: bool,
    /// Files written, in filter order.
    pub outputs: Vec<PathBuf>,
}

/// One template bound to its run-wide context.
#[derive(Debug, Clone, Copy)]
pub struct TemplateJob<'a> {
    spec: &'a TemplateSpec,
    output_root: &'a Path,
    defaults: &'a BTreeMap<String, String>,
}

impl<'a> TemplateJob<'a> {
    /// Bind `spec` to the run-wide output directory and default properties.
    #[must_use]
    pub const fn new(
        spec: &'a TemplateSpec,
        output_root: &'a Path,
        defaults: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            spec,
            output_root,
            defaults,
        }
    }

    /// Generate one output per filter file.
    ///
    /// A missing source is logged and skipped; every other failure aborts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FilterDirectoryMissing`] when the filter
    /// directory is gone, and read/write/expansion errors naming the file.
    pub fn run<E>(&self, enumerator: &E) -> EngineResult<TemplateReport>
    where
        E: FileEnumerator + ?Sized,
    {
        let source = &self.spec.source;
        if !source.exists() {
            warn!(source = %source.display(), "source template not found; skipping");
            return Ok(TemplateReport {
                source: source.clone(),
                skipped: true,
                outputs: Vec::new(),
            });
        }

        let output_dir = self.spec.effective_output_directory(self.output_root);
        fs::create_dir_all(output_dir).map_err(|source| EngineError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let filter_set = &self.spec.filter_set;
        let filters = enumerator
            .enumerate(filter_set)
            .map_err(|err| EngineError::from_enumeration(filter_set.directory.clone(), err))?;

        let template = fs::read_to_string(source).map_err(|err| EngineError::ReadSource {
            path: source.clone(),
            source: err,
        })?;

        let mut outputs = Vec::with_capacity(filters.len());
        let mut seen = HashSet::new();
        for filter in &filters {
            let result = self.expand_filter(&template, filter, output_dir)?;
            if !seen.insert(result.path.clone()) {
                warn!(
                    output = %result.path.display(),
                    filter = %filter.display(),
                    "output overwritten by a later filter"
                );
            }
            debug!(output = %result.path.display(), "creating output");
            result.write()?;
            outputs.push(result.path);
        }

        info!(
            source = %source.display(),
            filters = filters.len(),
            line_ending = %self.spec.line_ending,
            "template expanded"
        );
        Ok(TemplateReport {
            source: source.clone(),
            skipped: false,
            outputs,
        })
    }

    /// Expand `template` for one filter file without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ReadFilter`] when the filter cannot be read,
    /// [`EngineError::InvalidOutputName`] when the expanded name leaves
    /// `output_dir`, and [`EngineError::UnresolvedPlaceholder`] under the
    /// `fail` policy.
    pub fn expand_filter(
        &self,
        template: &str,
        filter: &Path,
        output_dir: &Path,
    ) -> EngineResult<ExpansionResult> {
        let properties = self.properties_for(filter)?;

        let name = NameExpander::new(self.spec.name_indicator, self.spec.unresolved)
            .expand(&self.spec.output_file_name_pattern, &properties);
        let path = output_path(output_dir, &name).ok_or_else(|| EngineError::InvalidOutputName {
            name: name.clone(),
            filter: filter.to_path_buf(),
        })?;

        let expanded = Expander::new(self.spec.content_indicator, self.spec.unresolved)
            .expand(template, &properties)
            .map_err(|UnresolvedKey(key)| EngineError::UnresolvedPlaceholder {
                key,
                template: self.spec.source.clone(),
                filter: filter.to_path_buf(),
            })?;
        let content = normalize_line_endings(&expanded, self.spec.line_ending).into_owned();

        Ok(ExpansionResult { path, content })
    }

    fn properties_for(&self, filter: &Path) -> EngineResult<PropertyBag> {
        let entries = load_properties(filter)?;
        Ok(PropertyBag::builder()
            .layer(self.defaults.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            .layer(entries)
            .with_synthetic_keys(filter, &self.spec.source))
    }
}

/// `output_dir/name`, or `None` when `name` is empty, absolute, or climbs out.
fn output_path(output_dir: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let contained = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    let named = relative
        .components()
        .any(|component| matches!(component, Component::Normal(_)));
    (contained && named).then(|| output_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tessera_config::{FilterSet, LineEnding, UnresolvedPolicy};
    use tessera_test_support::Workspace;

    #[test]
    fn output_path_rejects_escaping_names() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "q1.vm"), Some(PathBuf::from("out/q1.vm")));
        assert_eq!(
            output_path(dir, "nested/q1.vm"),
            Some(PathBuf::from("out/nested/q1.vm"))
        );
        assert_eq!(output_path(dir, ""), None);
        assert_eq!(output_path(dir, "."), None);
        assert_eq!(output_path(dir, "../q1.vm"), None);
        assert_eq!(output_path(dir, "/etc/q1.vm"), None);
    }

    #[test]
    fn expand_filter_layers_defaults_file_and_synthetic_keys() -> Result<(), Box<dyn Error>> {
        let workspace = Workspace::new()?;
        let source = workspace.write("report.vm", "")?;
        let filter = workspace.write(
            "filters/q1.properties",
            "title=Quarterly\nsourceBaseName=spoofed\n",
        )?;
        let mut spec = TemplateSpec::new(&source, FilterSet::new(workspace.join("filters")));
        spec.line_ending = LineEnding::Dos;
        let defaults = BTreeMap::from([
            ("title".to_string(), "Default".to_string()),
            ("vendor".to_string(), "acme".to_string()),
        ]);
        let job = TemplateJob::new(&spec, workspace.path(), &defaults);

        let result = job.expand_filter(
            "${title} by ${vendor}\nfrom ${sourceBaseName}.${sourceExtension}\n",
            &filter,
            Path::new("out"),
        )?;

        assert_eq!(result.path, PathBuf::from("out/q1.vm"));
        assert_eq!(result.content, "Quarterly by acme\r\nfrom report.vm\r\n");
        Ok(())
    }

    #[test]
    fn expand_filter_fails_on_unresolved_keys_when_strict() -> Result<(), Box<dyn Error>> {
        let workspace = Workspace::new()?;
        let source = workspace.write("greet.tmpl", "")?;
        let filter = workspace.write("filters/en.properties", "name=World\n")?;
        let mut spec = TemplateSpec::new(&source, FilterSet::new(workspace.join("filters")));
        spec.unresolved = UnresolvedPolicy::Fail;
        let defaults = BTreeMap::new();
        let job = TemplateJob::new(&spec, workspace.path(), &defaults);

        let err = job
            .expand_filter("Hello ${nobody}", &filter, workspace.path())
            .err()
            .ok_or_else(|| std::io::Error::other("expected failure"))?;
        assert!(
            matches!(&err, EngineError::UnresolvedPlaceholder { key, .. } if key == "nobody")
        );
        assert!(err.to_string().contains("en.properties"));
        Ok(())
    }

    #[test]
    fn expand_filter_rejects_names_outside_output_dir() -> Result<(), Box<dyn Error>> {
        let workspace = Workspace::new()?;
        let source = workspace.write("greet.tmpl", "")?;
        let filter = workspace.write("filters/en.properties", "target=../../etc/passwd\n")?;
        let mut spec = TemplateSpec::new(&source, FilterSet::new(workspace.join("filters")));
        spec.output_file_name_pattern = "@{target}".to_string();
        let defaults = BTreeMap::new();
        let job = TemplateJob::new(&spec, workspace.path(), &defaults);

        assert!(matches!(
            job.expand_filter("x", &filter, workspace.path()),
            Err(EngineError::InvalidOutputName { .. })
        ));
        Ok(())
    }

    #[test]
    fn missing_filter_file_is_a_read_error() -> Result<(), Box<dyn Error>> {
        let workspace = Workspace::new()?;
        let source = workspace.write("greet.tmpl", "")?;
        let spec = TemplateSpec::new(&source, FilterSet::new(workspace.join("filters")));
        let defaults = BTreeMap::new();
        let job = TemplateJob::new(&spec, workspace.path(), &defaults);

        let missing = workspace.join("filters/absent.properties");
        assert!(matches!(
            job.expand_filter("x", &missing, workspace.path()),
            Err(EngineError::ReadFilter { path, .. }) if path == missing
        ));
        Ok(())
    }
}
