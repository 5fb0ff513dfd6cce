// ABOUTME: Target host connection settings.
// ABOUTME: Secrets default to DEPLOY_HOST, DEPLOY_USER and DEPLOY_SSH_KEY.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::EnvValue;
use crate::error::{Error, Result};
use crate::types::Secret;

pub const HOST_ENV: &str = "DEPLOY_HOST";
pub const USER_ENV: &str = "DEPLOY_USER";
pub const KEY_ENV: &str = "DEPLOY_SSH_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: EnvValue,

    #[serde(default = "default_user")]
    pub user: EnvValue,

    /// Private key material. `null` falls back to the SSH agent and default keys.
    #[serde(default = "default_key")]
    pub key: Option<EnvValue>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub trust_first_connection: bool,

    #[serde(default)]
    pub known_hosts: Option<PathBuf>,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
}

fn default_host() -> EnvValue {
    EnvValue::from_env(HOST_ENV)
}

fn default_user() -> EnvValue {
    EnvValue::from_env(USER_ENV)
}

fn default_key() -> Option<EnvValue> {
    Some(EnvValue::from_env(KEY_ENV))
}

fn default_port() -> u16 {
    22
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            user: default_user(),
            key: default_key(),
            port: default_port(),
            trust_first_connection: false,
            known_hosts: None,
            command_timeout: default_command_timeout(),
        }
    }
}

/// Server settings with every secret resolved.
#[derive(Debug, Clone)]
pub struct ResolvedServer {
    pub host: Secret,
    pub user: Secret,
    pub key: Option<Secret>,
    pub port: u16,
    pub trust_first_connection: bool,
    pub known_hosts: Option<PathBuf>,
    pub command_timeout: Duration,
}

impl ServerConfig {
    pub fn resolve(&self) -> Result<ResolvedServer> {
        let host = self.host.resolve_secret()?;
        let user = self.user.resolve_secret()?;
        if host.is_empty() {
            return Err(Error::InvalidConfig("server host is empty".to_string()));
        }
        if user.is_empty() {
            return Err(Error::InvalidConfig("server user is empty".to_string()));
        }

        let key = self
            .key
            .as_ref()
            .map(EnvValue::resolve_secret)
            .transpose()?;

        Ok(ResolvedServer {
            host,
            user,
            key,
            port: self.port,
            trust_first_connection: self.trust_first_connection,
            known_hosts: self.known_hosts.clone(),
            command_timeout: self.command_timeout,
        })
    }
}
