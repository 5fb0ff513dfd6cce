// ABOUTME: Post-reload health verification settings.
// ABOUTME: Settle delay, bounded attempts, spacing, and the accepted status codes.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct HealthcheckConfig {
    /// Endpoint to probe. Defaults to `http://<server host>/`.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_settle", with = "humantime_serde")]
    pub settle: Duration,

    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_accept")]
    pub accept: Vec<u16>,
}

fn default_settle() -> Duration {
    Duration::from_secs(10)
}

fn default_attempts() -> u32 {
    2
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_accept() -> Vec<u16> {
    vec![200, 301, 302]
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        HealthcheckConfig {
            url: None,
            settle: default_settle(),
            attempts: default_attempts(),
            interval: default_interval(),
            timeout: default_timeout(),
            accept: default_accept(),
        }
    }
}
