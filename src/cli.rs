// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caravel")]
#[command(about = "Single-host continuous deployment with snapshots and automatic rollback")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to caravel.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new caravel.yml configuration file
    Init {
        /// Application (process) name
        #[arg(long)]
        app: Option<String>,

        /// Deployed root on the target host
        #[arg(long)]
        root: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Build and package the artifact without deploying it
    Build {
        /// Source directory (defaults to the current directory)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Build, deliver, release, reload, and verify; roll back on a failed health check
    Deploy {
        /// Source directory (defaults to the current directory)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Target this machine instead of connecting over SSH
        #[arg(long)]
        local: bool,
    },

    /// Restore the latest snapshot and reload the process
    Rollback {
        /// Target this machine instead of connecting over SSH
        #[arg(long)]
        local: bool,
    },

    /// List snapshots on the target host, newest first
    Snapshots {
        /// Target this machine instead of connecting over SSH
        #[arg(long)]
        local: bool,
    },
}
