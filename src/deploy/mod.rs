// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, rollback, and the pipeline driver.

mod deployment;
mod error;
mod pipeline;
mod rollback;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use pipeline::{DeployReport, Pipeline};
pub use rollback::{RollbackError, RollbackOutcome, manual_rollback, restore_previous_release};
pub use state::{Built, Delivered, Initialized, Released, Reloaded, Verified};
pub use transitions::TransitionResult;
