// ABOUTME: Library root for caravel - exposes the pipeline components for the CLI and tests.
// ABOUTME: The main binary is in main.rs.

pub mod artifact;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod health;
pub mod host;
pub mod output;
pub mod release;
pub mod snapshot;
pub mod ssh;
pub mod supervisor;
pub mod types;
