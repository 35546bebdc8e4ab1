//! Renderers for run reports and validated plans.

use std::fmt::Write as _;

use anyhow::anyhow;
use tessera_config::RunPlan;
use tessera_engine::BatchReport;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

pub(crate) fn render_report(report: &BatchReport, format: OutputFormat) -> CliResult<()> {
    print!("{}", format_report(report, format)?);
    Ok(())
}

pub(crate) fn format_report(report: &BatchReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(report)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Text => {
            let mut text = String::new();
            for template in &report.templates {
                let source = template.source.display();
                if template.skipped {
                    let _ = writeln!(text, "skipped {source}: source template not found");
                    continue;
                }
                let _ = writeln!(text, "{source}: {} file(s)", template.outputs.len());
                for output in &template.outputs {
                    let _ = writeln!(text, "  {}", output.display());
                }
            }
            let _ = writeln!(
                text,
                "wrote {} file(s), skipped {} template(s)",
                report.written(),
                report.skipped()
            );
            Ok(text)
        }
    }
}

pub(crate) fn format_plan(plan: &RunPlan) -> String {
    let mut text = String::new();
    for template in &plan.templates {
        let _ = writeln!(
            text,
            "{} <- {} -> {}",
            template.source.display(),
            template.filter_set.directory.display(),
            template
                .effective_output_directory(&plan.output_directory)
                .display()
        );
    }
    let _ = writeln!(text, "configuration ok: {} template(s)", plan.templates.len());
    text
}
