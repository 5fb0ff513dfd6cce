// ABOUTME: Config values that are either literal or read from the environment.
// ABOUTME: Used for the out-of-band deployment secrets (host, user, private key).

use crate::error::{Error, Result};
use crate::types::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Reference to an environment variable without a fallback.
    pub fn from_env(var: &str) -> Self {
        EnvValue::FromEnv {
            var: var.to_string(),
            default: None,
        }
    }

    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) if !val.is_empty() => Ok(val),
                _ => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }

    /// Resolve into a [`Secret`] so the value cannot leak through `Debug`.
    pub fn resolve_secret(&self) -> Result<Secret> {
        self.resolve().map(Secret::from)
    }
}
