//! Offline validator for resource restriction annotations.
//!
//! Scans role policy files and runs the configuration checks the
//! authenticator applies at login time, so broken roles are caught before
//! they are loaded.

mod config;
mod scanner;
mod validator;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LoggingConfig};
use crate::validator::{ProviderSelection, ValidationResult};

/// Validate resource restrictions declared in role policy files.
#[derive(Debug, Parser)]
#[command(name = "restrictions-validator", version, about)]
struct Cli {
    /// Files or directories to scan for `*.yaml`, `*.yml` and `*.json` policies.
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Authenticator service id used to resolve service-specific annotations.
    #[arg(long)]
    service_id: String,

    /// Providers to validate roles against.
    #[arg(long, value_enum, default_value_t = ProviderSelection::Auto)]
    provider: ProviderSelection,

    /// Glob patterns of files to skip. May be repeated.
    #[arg(long)]
    exclude: Vec<String>,

    /// Print a JSON report instead of one line per failure.
    #[arg(long)]
    json: bool,

    /// Log debug diagnostics to stderr.
    #[arg(long, short)]
    verbose: bool,

    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(cfg: &LoggingConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { cfg.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let installed = if cfg.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

fn run(cli: &Cli) -> anyhow::Result<ValidationResult> {
    let cfg = AppConfig::load(cli.config.as_deref())?;
    init_logging(&cfg.logging, cli.verbose);

    let files = scanner::find_files(&cli.paths, &cli.exclude);
    tracing::info!(files = files.len(), "Scanning policy files");

    let mut result = ValidationResult::new(files.len());
    for file in &files {
        let (errors, roles) =
            validator::validate_file(file, &cli.service_id, cli.provider, &cfg.restrictions);
        result.roles_checked += roles;
        result.add_errors(errors);
    }
    Ok(result)
}

fn report(result: &ValidationResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for error in &result.errors {
        println!("{error}");
    }
    println!(
        "{} file(s), {} role(s) checked, {} failure(s)",
        result.files_scanned,
        result.roles_checked,
        result.errors.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).and_then(|result| report(&result, cli.json).map(|()| result.is_ok())) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
