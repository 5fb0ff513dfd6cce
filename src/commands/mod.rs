// ABOUTME: Command module aggregator for the caravel CLI.
// ABOUTME: Re-exports build, deploy, rollback, and snapshots command handlers.

mod build;
mod deploy;
mod rollback;
mod snapshots;
mod target;

pub use build::build;
pub use deploy::deploy;
pub use rollback::rollback;
pub use snapshots::snapshots;
