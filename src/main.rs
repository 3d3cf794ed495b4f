//! Tessera - signed entitlement passes
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tessera::cli::commands;
use tessera::cli::{Cli, Commands};
use tessera::config::{Config, ConfigManager};
use tessera::error::TesseraResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, config: &Config) {
    // 0 = warn, 1 = info, 2+ = debug
    let filter = match verbose {
        0 => EnvFilter::new("tessera=warn"),
        1 => EnvFilter::new("tessera=info"),
        _ => EnvFilter::new("tessera=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

async fn run() -> TesseraResult<ExitCode> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);

    let secret = cli.secret.as_deref();
    match cli.command {
        Commands::Issue(args) => {
            let codec = commands::codec(&config, secret)?;
            commands::issue(args, &config, &codec).await?;
        }
        Commands::Verify(args) => {
            let codec = commands::codec(&config, secret)?;
            if !commands::verify(args, &config, &codec).await? {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Artifact(args) => {
            let codec = commands::codec(&config, secret)?;
            commands::artifact(args, &config, &codec).await?;
        }
        Commands::List(args) => commands::list(args, &config).await?,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await?,
    }

    Ok(ExitCode::SUCCESS)
}
