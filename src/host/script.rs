// ABOUTME: Ordered lists of named shell steps executed with fail-fast semantics.
// ABOUTME: Replaces `a && b && c` chaining with steps that report which one failed.

use thiserror::Error;

use super::{HostError, RemoteHost};

/// Quote a string for safe interpolation into a POSIX shell command.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("step '{step}' could not run: {source}")]
    Host {
        step: String,
        #[source]
        source: HostError,
    },

    #[error("step '{step}' exited with code {exit_code}: {stderr}")]
    Failed {
        step: String,
        exit_code: u32,
        stderr: String,
    },
}

impl ScriptError {
    pub fn step(&self) -> &str {
        match self {
            ScriptError::Host { step, .. } | ScriptError::Failed { step, .. } => step,
        }
    }
}

#[derive(Debug, Clone)]
struct Step {
    name: String,
    command: String,
}

/// An ordered sequence of fallible steps. The first failure stops the run.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.steps.push(Step {
            name: name.into(),
            command: command.into(),
        });
        self
    }

    /// Run every step in order, returning at the first one that fails.
    pub async fn run<H: RemoteHost + ?Sized>(&self, host: &H) -> Result<(), ScriptError> {
        for step in &self.steps {
            tracing::debug!(step = %step.name, "running remote step");

            let output = host
                .exec(&step.command)
                .await
                .map_err(|source| ScriptError::Host {
                    step: step.name.clone(),
                    source,
                })?;

            if !output.success() {
                tracing::debug!(step = %step.name, exit_code = output.exit_code, "remote step failed");
                return Err(ScriptError::Failed {
                    step: step.name.clone(),
                    exit_code: output.exit_code,
                    stderr: output.stderr.trim().to_string(),
                });
            }
        }
        Ok(())
    }
}
