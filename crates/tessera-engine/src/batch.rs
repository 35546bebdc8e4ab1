//! Sequential, fail-stop execution of a whole run.

use std::collections::BTreeMap;
use std::env;

use serde::Serialize;
use tessera_config::{RunConfig, RunPlan};
use tessera_fsops::{FileEnumerator, GlobEnumerator};
use tracing::info;

use crate::error::EngineResult;
use crate::job::{TemplateJob, TemplateReport};

/// Outcome of a run, one entry per template in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Per-template results.
    pub templates: Vec<TemplateReport>,
}

impl BatchReport {
    /// Total number of files written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.templates
            .iter()
            .map(|template| template.outputs.len())
            .sum()
    }

    /// Number of templates skipped because their source was missing.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.templates
            .iter()
            .filter(|template| template.skipped)
            .count()
    }
}

/// Validates a run document and executes its templates one after another.
///
/// Holds no state between runs: the environment snapshot is taken per run
/// unless fixed with [`BatchRunner::with_environment`].
#[derive(Debug, Clone, Default)]
pub struct BatchRunner<E = GlobEnumerator> {
    enumerator: E,
    environment: Option<BTreeMap<String, String>>,
}

impl BatchRunner {
    /// Runner using the glob-based filter enumerator.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_enumerator(GlobEnumerator::new())
    }
}

impl<E: FileEnumerator> BatchRunner<E> {
    /// Runner using a custom filter enumerator.
    #[must_use]
    pub const fn with_enumerator(enumerator: E) -> Self {
        Self {
            enumerator,
            environment: None,
        }
    }

    /// Use `vars` instead of the process environment as the lowest property layer.
    #[must_use]
    pub fn with_environment<K, V, I>(mut self, vars: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.environment = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Validate `config`, then run every template.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Config`] before touching any file when
    /// validation fails, or the first error raised by a template.
    pub fn run(&self, config: RunConfig) -> EngineResult<BatchReport> {
        let plan = config.validate()?;
        self.run_plan(&plan)
    }

    /// Run an already validated plan.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a template; later templates do not run.
    pub fn run_plan(&self, plan: &RunPlan) -> EngineResult<BatchReport> {
        let defaults = self.property_defaults(plan);
        info!(templates = plan.templates.len(), "starting template run");

        let mut report = BatchReport::default();
        for spec in &plan.templates {
            let job = TemplateJob::new(spec, &plan.output_directory, &defaults);
            report.templates.push(job.run(&self.enumerator)?);
        }

        info!(
            written = report.written(),
            skipped = report.skipped(),
            "template run finished"
        );
        Ok(report)
    }

    fn property_defaults(&self, plan: &RunPlan) -> BTreeMap<String, String> {
        let mut defaults = BTreeMap::new();
        if plan.inherit_environment {
            match &self.environment {
                Some(vars) => defaults.extend(vars.clone()),
                None => defaults.extend(process_environment()),
            }
        }
        defaults.extend(plan.properties.clone());
        defaults
    }
}

/// Environment variables with UTF-8 names and values.
fn process_environment() -> impl Iterator<Item = (String, String)> {
    env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
