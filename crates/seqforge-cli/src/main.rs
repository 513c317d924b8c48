mod config;
mod logging;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use schemars::schema_for;
use seqforge_core::{RecordConfig, CONFIG_VERSION};
use seqforge_generate::{collect_accepted, GenerationError, GeneratorRegistry, InputAssembly};
use thiserror::Error;
use uuid::Uuid;

use config::{load_config, ConfigError};
use logging::{init_logging, LoggingError};

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("{0}")]
    Logging(#[from] LoggingError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "seqforge", version, about = "Sequential synthetic record generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print accepted records, one per line.
    Generate(GenerateArgs),
    /// Check a configuration by building and seeding its generators.
    Validate(ValidateArgs),
    /// List the registered generator keywords.
    Generators,
    /// Print the JSON schema of the configuration file.
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML record configuration.
    #[arg(long, short)]
    config: PathBuf,
    /// Number of accepted records to print.
    #[arg(long, short = 'n', default_value_t = 10)]
    count: usize,
    /// Give up after this many consecutive rejected records.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_attempts: Option<u64>,
    /// Append JSON logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print a JSON generation report to stderr.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// TOML record configuration.
    #[arg(long, short)]
    config: PathBuf,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::Generators => list_generators(),
        Command::Schema => print_schema(),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;

    let run_id = Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now();
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        started_at = %started_at.to_rfc3339(),
        config = %args.config.display(),
        config_version = CONFIG_VERSION,
        count = args.count
    );

    let timer = Instant::now();
    let config = load_config(&args.config)?;
    let orchestrator = InputAssembly::from_config(&config)?;
    let (records, report) =
        collect_accepted(orchestrator.generate(), args.count, args.max_attempts)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for record in &records {
        writeln!(out, "{record}")?;
    }
    out.flush()?;

    if args.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        status = "success",
        accepted = report.accepted,
        rejected = report.rejected,
        acceptance_rate = report.acceptance_rate(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    init_logging(None)?;

    let config = load_config(&args.config)?;
    let orchestrator = InputAssembly::from_config(&config)?;
    let seeded = orchestrator
        .check_template()
        .map_err(GenerationError::from)?;
    let driving = orchestrator
        .slots()
        .iter()
        .filter(|slot| slot.is_driving())
        .count();

    println!(
        "{}: {} slot(s), {} driving, template \"{}\"",
        args.config.display(),
        orchestrator.slots().len(),
        driving,
        config.template
    );
    match seeded {
        Some(record) => println!("first record: {record}"),
        None => println!("first record: rejected"),
    }
    Ok(())
}

fn list_generators() -> Result<(), CliError> {
    let registry = GeneratorRegistry::new();
    for kind in registry.kinds() {
        println!("{}", kind.keyword());
    }
    Ok(())
}

fn print_schema() -> Result<(), CliError> {
    let schema = schema_for!(RecordConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
