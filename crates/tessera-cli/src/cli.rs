//! Argument parsing and command dispatch for the `tessera` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tessera_config::defaults::DEFAULT_CONFIG_FILE;
use tessera_config::{RunConfig, load_run_config};
use tessera_engine::BatchRunner;
use tessera_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};
use crate::output::{format_plan, render_report};

/// Parses CLI arguments, installs logging, and executes the requested
/// command. Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    };
    if let Err(err) = init_logging(&logging) {
        let err = CliError::failure(err);
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    match dispatch(&cli.command) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn dispatch(command: &Command) -> CliResult<()> {
    match command {
        Command::Run(args) => handle_run(args),
        Command::Check(args) => handle_check(args),
    }
}

fn handle_run(args: &RunArgs) -> CliResult<()> {
    let config = args.document.load()?;
    let report = BatchRunner::new().run(config)?;
    info!(
        written = report.written(),
        skipped = report.skipped(),
        "run complete"
    );
    render_report(&report, args.format)
}

fn handle_check(args: &DocumentArgs) -> CliResult<()> {
    let plan = args.load()?.validate()?;
    print!("{}", format_plan(&plan));
    Ok(())
}

#[derive(Parser)]
#[command(
    name = "tessera",
    version,
    about = "Expand source templates once per filter property file"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "TESSERA_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        help = "Log output format (pretty or json); defaults by build profile"
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the run document, then generate every output file.
    Run(RunArgs),
    /// Validate the run document without writing anything.
    Check(DocumentArgs),
}

#[derive(Args)]
struct DocumentArgs {
    #[arg(
        long,
        short = 'c',
        env = "TESSERA_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Run document (YAML)"
    )]
    config: PathBuf,
    #[arg(long, help = "Override the run-wide output directory")]
    output_dir: Option<PathBuf>,
}

impl DocumentArgs {
    fn load(&self) -> CliResult<RunConfig> {
        let config = load_run_config(&self.config)?;
        debug!(config = %self.config.display(), "run document loaded");
        Ok(match &self.output_dir {
            Some(directory) => config.with_output_directory(directory),
            None => config,
        })
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    document: DocumentArgs,
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Select the report format"
    )]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
