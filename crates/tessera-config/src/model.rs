//! Typed configuration models.
//!
//! `RunConfig` mirrors the YAML document and tolerates missing fields so the
//! validation pass can report them precisely. `RunPlan` is what the engine
//! consumes: every required field is present and every path has been checked.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Loose run document as written by users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Run-wide default output directory.
    pub output_directory: Option<PathBuf>,
    /// Run-level default properties, shadowed by filter file entries.
    pub properties: BTreeMap<String, String>,
    /// Whether the process environment seeds the property defaults.
    pub inherit_environment: bool,
    /// Template descriptors, processed in order.
    pub templates: Vec<TemplateConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            properties: BTreeMap::new(),
            inherit_environment: defaults::enabled(),
            templates: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Replace the run-wide output directory, typically from a CLI flag.
    #[must_use]
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    /// Rebase every relative path in the document onto `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        rebase(base, &mut self.output_directory);
        for template in &mut self.templates {
            rebase(base, &mut template.source);
            rebase(base, &mut template.output_directory);
            if let Some(filter_set) = &mut template.filter_set
                && filter_set.directory.is_relative()
            {
                filter_set.directory = base.join(&filter_set.directory);
            }
        }
    }
}

fn rebase(base: &Path, path: &mut Option<PathBuf>) {
    if let Some(value) = path
        && value.is_relative()
    {
        *value = base.join(&*value);
    }
}

/// One template entry of the run document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Source template file.
    pub source: Option<PathBuf>,
    /// Output directory override for this template.
    pub output_directory: Option<PathBuf>,
    /// Output file name pattern, expanded with the name indicator.
    pub output_file_name_pattern: String,
    /// Filter property files feeding this template.
    pub filter_set: Option<FilterSet>,
    /// Line ending policy for generated content.
    pub line_ending: LineEnding,
    /// Indicator for placeholders in template content.
    pub content_indicator: char,
    /// Indicator for placeholders in the output name pattern.
    pub name_indicator: char,
    /// What to do with placeholders whose key has no value.
    pub unresolved: UnresolvedPolicy,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            source: None,
            output_directory: None,
            output_file_name_pattern: defaults::output_file_name_pattern(),
            filter_set: None,
            line_ending: LineEnding::default(),
            content_indicator: defaults::content_indicator(),
            name_indicator: defaults::name_indicator(),
            unresolved: UnresolvedPolicy::default(),
        }
    }
}

/// Directory plus include/exclude glob patterns selecting filter files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSet {
    /// Directory scanned for filter files.
    pub directory: PathBuf,
    /// Include patterns relative to `directory`; empty means everything.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Exclude patterns relative to `directory`.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Whether VCS and editor clutter is excluded automatically.
    #[serde(default = "defaults::enabled")]
    pub use_default_excludes: bool,
}

impl FilterSet {
    /// Filter set selecting every file below `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            use_default_excludes: true,
        }
    }

    /// Add an include pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    /// Add an exclude pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }
}

/// Line ending policy applied to expanded content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Leave line endings untouched.
    #[default]
    Keep,
    /// Emit CRLF everywhere.
    Dos,
    /// Collapse CRLF to LF.
    Unix,
}

impl LineEnding {
    /// Canonical configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Dos => "dos",
            Self::Unix => "unix",
        }
    }
}

impl Display for LineEnding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Handling of placeholders whose key is absent from the property bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Emit the placeholder text unchanged.
    #[default]
    Keep,
    /// Abort the template with an error naming the key.
    Fail,
}

/// Validated run, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Run-wide default output directory.
    pub output_directory: PathBuf,
    /// Run-level default properties.
    pub properties: BTreeMap<String, String>,
    /// Whether the process environment seeds the property defaults.
    pub inherit_environment: bool,
    /// Validated templates in document order.
    pub templates: Vec<TemplateSpec>,
}

/// Validated template descriptor. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Source template file.
    pub source: PathBuf,
    /// Output directory override.
    pub output_directory: Option<PathBuf>,
    /// Output file name pattern.
    pub output_file_name_pattern: String,
    /// Filter files feeding this template.
    pub filter_set: FilterSet,
    /// Line ending policy.
    pub line_ending: LineEnding,
    /// Indicator for content placeholders.
    pub content_indicator: char,
    /// Indicator for output name placeholders.
    pub name_indicator: char,
    /// Unresolved placeholder handling.
    pub unresolved: UnresolvedPolicy,
}

impl TemplateSpec {
    /// Template with default settings for `source` and `filter_set`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, filter_set: FilterSet) -> Self {
        Self {
            source: source.into(),
            output_directory: None,
            output_file_name_pattern: defaults::output_file_name_pattern(),
            filter_set,
            line_ending: LineEnding::default(),
            content_indicator: defaults::content_indicator(),
            name_indicator: defaults::name_indicator(),
            unresolved: UnresolvedPolicy::default(),
        }
    }

    /// The override directory when present, else `run_default`.
    #[must_use]
    pub fn effective_output_directory<'a>(&'a self, run_default: &'a Path) -> &'a Path {
        self.output_directory.as_deref().unwrap_or(run_default)
    }
}
