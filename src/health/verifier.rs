// ABOUTME: Health verifier: settle, then a bounded number of spaced probes.
// ABOUTME: Exceeding the bound is a definitive failure that triggers rollback.

use std::time::Duration;
use thiserror::Error;

use super::HttpProbe;
use crate::config::HealthcheckConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("health check failed after {attempts} attempts (last status {last_status:03})")]
pub struct HealthCheckFailure {
    pub attempts: u32,
    pub last_status: u16,
}

pub struct HealthVerifier<P> {
    probe: P,
    url: String,
    settle: Duration,
    attempts: u32,
    interval: Duration,
    accept: Vec<u16>,
}

impl<P: HttpProbe> HealthVerifier<P> {
    pub fn new(probe: P, url: impl Into<String>, config: &HealthcheckConfig) -> Self {
        Self {
            probe,
            url: url.into(),
            settle: config.settle,
            attempts: config.attempts.max(1),
            interval: config.interval,
            accept: config.accept.clone(),
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_accepted(&self, status: u16) -> bool {
        self.accept.contains(&status)
    }

    /// Returns the accepted status, or the failure after the last attempt.
    pub async fn verify(&self) -> Result<u16, HealthCheckFailure> {
        tracing::debug!(settle = ?self.settle, "waiting before first health probe");
        tokio::time::sleep(self.settle).await;

        let mut last_status = 0;
        for attempt in 1..=self.attempts {
            if attempt > 1 {
                tokio::time::sleep(self.interval).await;
            }

            last_status = self.probe.probe(&self.url).await;
            if self.is_accepted(last_status) {
                tracing::info!(attempt, status = last_status, "health check passed");
                return Ok(last_status);
            }
            tracing::warn!(
                attempt,
                of = self.attempts,
                status = %format!("{last_status:03}"),
                "health probe not accepted"
            );
        }

        Err(HealthCheckFailure {
            attempts: self.attempts,
            last_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Probe answering from a script of statuses.
    struct Scripted {
        statuses: Mutex<VecDeque<u16>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(statuses: &[u16]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpProbe for Scripted {
        async fn probe(&self, _url: &str) -> u16 {
            *self.calls.lock() += 1;
            self.statuses.lock().pop_front().unwrap_or(0)
        }
    }

    fn instant() -> HealthcheckConfig {
        HealthcheckConfig {
            settle: Duration::ZERO,
            interval: Duration::ZERO,
            ..HealthcheckConfig::default()
        }
    }

    #[test]
    fn only_listed_codes_are_healthy() {
        let verifier = HealthVerifier::new(Scripted::new(&[]), "http://app/", &instant());
        for status in [200, 301, 302] {
            assert!(verifier.is_accepted(status));
        }
        for status in [0, 204, 304, 404, 500, 502] {
            assert!(!verifier.is_accepted(status));
        }
    }

    #[tokio::test]
    async fn second_attempt_can_pass() {
        let verifier = HealthVerifier::new(Scripted::new(&[502, 200]), "http://app/", &instant());
        assert_eq!(verifier.verify().await, Ok(200));
    }

    #[tokio::test]
    async fn gives_up_after_configured_attempts() {
        let verifier = HealthVerifier::new(Scripted::new(&[0, 0, 200]), "http://app/", &instant());

        let failure = verifier.verify().await.unwrap_err();

        assert_eq!(
            failure,
            HealthCheckFailure {
                attempts: 2,
                last_status: 0
            }
        );
        assert_eq!(*verifier.probe.calls.lock(), 2);
        assert_eq!(
            failure.to_string(),
            "health check failed after 2 attempts (last status 000)"
        );
    }

    #[tokio::test]
    async fn waits_settle_and_interval() {
        let config = HealthcheckConfig {
            settle: Duration::from_millis(60),
            interval: Duration::from_millis(40),
            ..HealthcheckConfig::default()
        };
        let verifier = HealthVerifier::new(Scripted::new(&[500, 500]), "http://app/", &config);
        let started = std::time::Instant::now();

        verifier.verify().await.unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
