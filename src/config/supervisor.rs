// ABOUTME: Process supervisor settings.
// ABOUTME: Supervisor binary, process configuration file, and environment name.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default = "default_program")]
    pub program: String,

    /// Process configuration file, relative to the deployed root.
    #[serde(default = "default_ecosystem")]
    pub ecosystem: String,

    /// Named environment block to apply on start and reload.
    #[serde(default = "default_env")]
    pub env: Option<String>,
}

fn default_program() -> String {
    "pm2".to_string()
}

fn default_ecosystem() -> String {
    "ecosystem.config.js".to_string()
}

fn default_env() -> Option<String> {
    Some("production".to_string())
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            program: default_program(),
            ecosystem: default_ecosystem(),
            env: default_env(),
        }
    }
}
