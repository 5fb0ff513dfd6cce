// ABOUTME: Supervisor implementation for pm2.
// ABOUTME: Every command runs inside the deployed root so the ecosystem file resolves.

use async_trait::async_trait;

use super::{ProcessPresence, Supervisor, SupervisorError};
use crate::config::SupervisorConfig;
use crate::host::{CommandOutput, RemoteHost, quote};
use crate::types::ProcessName;

#[derive(Debug, Clone)]
pub struct Pm2 {
    program: String,
    ecosystem: String,
    env: Option<String>,
    root: String,
}

impl Pm2 {
    pub fn new(config: &SupervisorConfig, root: impl Into<String>) -> Self {
        Self {
            program: config.program.clone(),
            ecosystem: config.ecosystem.clone(),
            env: config.env.clone(),
            root: root.into(),
        }
    }

    fn command(&self, args: &str) -> String {
        format!("cd {} && {} {}", quote(&self.root), self.program, args)
    }

    fn with_env(&self, mut args: String) -> String {
        if let Some(ref env) = self.env {
            args.push_str(&format!(" --env {}", quote(env)));
        }
        args
    }

    async fn run(
        &self,
        host: &dyn RemoteHost,
        operation: &'static str,
        args: &str,
    ) -> Result<CommandOutput, SupervisorError> {
        host.exec(&self.command(args))
            .await
            .map_err(|source| SupervisorError::Host { operation, source })
    }
}

#[async_trait]
impl Supervisor for Pm2 {
    async fn describe(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
    ) -> Result<ProcessPresence, SupervisorError> {
        // pm2 exits non-zero for unknown process names.
        let output = self
            .run(host, "describe", &format!("describe {}", quote(name.as_str())))
            .await?;
        Ok(if output.success() {
            ProcessPresence::Present
        } else {
            ProcessPresence::Absent
        })
    }

    async fn start(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
    ) -> Result<(), SupervisorError> {
        let args = self.with_env(format!(
            "start {} --only {}",
            quote(&self.ecosystem),
            quote(name.as_str())
        ));
        SupervisorError::check("start", self.run(host, "start", &args).await?)
    }

    async fn reload(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
        update_env: bool,
    ) -> Result<(), SupervisorError> {
        let mut args = self.with_env(format!(
            "reload {} --only {}",
            quote(&self.ecosystem),
            quote(name.as_str())
        ));
        if update_env {
            args.push_str(" --update-env");
        }
        SupervisorError::check("reload", self.run(host, "reload", &args).await?)
    }

    async fn save(&self, host: &dyn RemoteHost) -> Result<(), SupervisorError> {
        SupervisorError::check("save", self.run(host, "save", "save").await?)
    }
}
