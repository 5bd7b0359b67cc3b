mod commands;
mod logging;
mod progress;
mod web;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use fileindex_core::{AppConfig, ScanOptions};
use logging::LogSettings;
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    let args = Cli::parse();

    dotenv().ok();

    let _guard = logging::init_logger(&LogSettings::from_env());

    if let Err(err) = run(args) {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

/// Commands that need no configuration run before any is loaded, so a
/// broken config file never blocks `version` or the help text.
fn run(args: Cli) -> anyhow::Result<()> {
    let command = match args.command {
        Some(Commands::Version) => {
            println!("{} version {}", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        None => {
            let _ = Cli::command().print_long_help();
            return Ok(());
        }
        Some(command) => command,
    };

    let mut config = load_config(args.config.as_deref())?;

    match command {
        Commands::Scan(flags) => {
            flags.apply(&mut config);
            run_scan(&config)
        }
        Commands::Load(flags) => {
            flags.apply(&mut config);
            run_load(&config)
        }
        Commands::Service(flags) => {
            flags.apply(&mut config);
            run_service(&config)
        }
        Commands::PrintConfig => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => fileindex_core::config::load_configuration_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => fileindex_core::config::load_configuration().context("loading configuration")?,
    };
    Ok(config)
}

fn run_scan(config: &AppConfig) -> anyhow::Result<()> {
    let options = ScanOptions {
        volume_name: config.require_volume_name()?.to_string(),
        root_path: PathBuf::from(config.require_root_path()?),
        output_file_name: PathBuf::from(&config.output_file_name),
        ignore_patterns: config.ignore_patterns.clone(),
    };
    info!(
        "Scanning {} as volume {} into {}",
        options.root_path.display(),
        options.volume_name,
        options.output_file_name.display()
    );

    let reporter = CliReporter::new();
    let result = fileindex_core::scan(&options, &reporter)?;

    info!(
        "{} files recorded, {} skipped, {} bytes hashed in {}",
        format!("{}", result.files_recorded).green(),
        format!("{}", result.files_skipped).red(),
        format!("{}", result.bytes_hashed).cyan(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );
    Ok(())
}

fn run_load(config: &AppConfig) -> anyhow::Result<()> {
    let json_file = Path::new(&config.json_file_name);
    let sqlite_file = Path::new(&config.sqlite_file_name);
    info!("Loading {} into {}", json_file.display(), sqlite_file.display());

    let reporter = CliReporter::new();
    let result = fileindex_core::load(json_file, sqlite_file, &reporter)
        .with_context(|| format!("loading {}", json_file.display()))?;

    info!(
        "{} rows inserted, {} lines skipped in {}",
        format!("{}", result.inserted).green(),
        format!("{}", result.skipped).red(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );
    Ok(())
}

fn run_service(config: &AppConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(web::serve(
        &config.host,
        config.port,
        PathBuf::from(&config.sqlite_file_name),
    ))
}
