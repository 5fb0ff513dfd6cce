// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::artifact::Artifact;
use crate::config::Config;
use crate::release::ReleaseReport;
use crate::supervisor::ReloadOutcome;
use crate::types::ProcessName;

use super::state::{Built, Delivered, Initialized, Released, Reloaded, Verified};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (the artifact,
/// the release report) directly in the state type, so accessors only exist
/// once the data does.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: Config,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(config: Config) -> Self {
        Deployment {
            config,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn app(&self) -> &ProcessName {
        &self.config.app
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

macro_rules! artifact_accessor {
    ($($state:ty),*) => {
        $(
            impl Deployment<$state> {
                pub fn artifact(&self) -> &Artifact {
                    &self.state.artifact
                }
            }
        )*
    };
}

artifact_accessor!(Built, Delivered, Released, Reloaded, Verified);

impl Deployment<Delivered> {
    /// Where the artifact was uploaded on the host.
    pub fn remote_archive(&self) -> &str {
        &self.state.remote_archive
    }
}

impl Deployment<Released> {
    pub fn release_report(&self) -> &ReleaseReport {
        &self.state.report
    }
}

impl Deployment<Reloaded> {
    pub fn release_report(&self) -> &ReleaseReport {
        &self.state.report
    }

    pub fn reload_outcome(&self) -> ReloadOutcome {
        self.state.outcome
    }
}

impl Deployment<Verified> {
    pub fn release_report(&self) -> &ReleaseReport {
        &self.state.report
    }

    pub fn reload_outcome(&self) -> ReloadOutcome {
        self.state.outcome
    }

    /// Status code that satisfied the health check.
    pub fn health_status(&self) -> u16 {
        self.state.status
    }
}
