// ABOUTME: Entry point for the caravel CLI application.
// ABOUTME: Parses arguments, initializes logging, and dispatches to command handlers.

mod cli;
mod commands;

use caravel::config::{self, Config};
use caravel::error::Result;
use caravel::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG; otherwise RUST_LOG, then warnings only.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { app, root, force } => {
            config::init_config(&cwd, app.as_deref(), root.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Build { source } => {
            let config = load_config(cli.config, &cwd)?;
            commands::build(config, source_dir(source, &cwd), output).await
        }
        Commands::Deploy { source, local } => {
            let config = load_config(cli.config, &cwd)?;
            commands::deploy(config, source_dir(source, &cwd), local, output).await
        }
        Commands::Rollback { local } => {
            let config = load_config(cli.config, &cwd)?;
            commands::rollback(config, local, output).await
        }
        Commands::Snapshots { local } => {
            let config = load_config(cli.config, &cwd)?;
            commands::snapshots(config, local, output).await
        }
    }
}

fn load_config(path: Option<PathBuf>, cwd: &std::path::Path) -> Result<Config> {
    match path {
        Some(path) => Config::load(&path),
        None => Config::discover(cwd),
    }
}

fn source_dir(source: Option<PathBuf>, cwd: &std::path::Path) -> PathBuf {
    source.unwrap_or_else(|| cwd.to_path_buf())
}
