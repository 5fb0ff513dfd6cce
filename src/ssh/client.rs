// ABOUTME: SSH session management using russh.
// ABOUTME: Handles host verification, authentication, command execution, and file upload.

use super::error::{Error, Result};
use crate::host::{CommandOutput, quote};
use russh::client::{self, Config, Handle, Msg};
use russh::keys::agent::client::AgentClient;
use russh::keys::known_hosts::{
    check_known_hosts, check_known_hosts_path, learn_known_hosts, learn_known_hosts_path,
};
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key, ssh_key};
use russh::{Channel, ChannelMsg, Disconnect};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixStream;

/// Configuration for establishing an SSH session.
///
/// Host and user are deployment secrets, so `Debug` leaves them out.
#[derive(Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Private key file. If None, tries the SSH agent then default key locations.
    pub key_path: Option<PathBuf>,
    /// Accept and record unknown host keys (Trust On First Use).
    pub trust_on_first_use: bool,
    /// known_hosts file; None means ~/.ssh/known_hosts.
    pub known_hosts_path: Option<PathBuf>,
    pub command_timeout: Duration,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("port", &self.port)
            .field("key_path", &self.key_path.as_ref().map(|_| "<transient>"))
            .field("trust_on_first_use", &self.trust_on_first_use)
            .field("known_hosts_path", &self.known_hosts_path)
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            key_path: None,
            trust_on_first_use: false,
            known_hosts_path: None,
            command_timeout: Duration::from_secs(300),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = Some(path.into());
        self
    }

    pub fn trust_on_first_use(mut self, tofu: bool) -> Self {
        self.trust_on_first_use = tofu;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// SSH client handler for russh.
pub(crate) struct SshHandler {
    host: String,
    port: u16,
    trust_on_first_use: bool,
    known_hosts_path: Option<PathBuf>,
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let check_result = match &self.known_hosts_path {
            Some(path) => check_known_hosts_path(&self.host, self.port, server_public_key, path),
            None => check_known_hosts(&self.host, self.port, server_public_key),
        };

        match check_result {
            Ok(true) => Ok(true),
            Ok(false) if self.trust_on_first_use => {
                tracing::warn!("Trust-On-First-Use: accepting unknown host key");
                let learn_result = match &self.known_hosts_path {
                    Some(path) => {
                        learn_known_hosts_path(&self.host, self.port, server_public_key, path)
                    }
                    None => learn_known_hosts(&self.host, self.port, server_public_key),
                };
                if let Err(e) = learn_result {
                    tracing::warn!("Failed to save host key to known_hosts: {}", e);
                }
                Ok(true)
            }
            Ok(false) => {
                tracing::error!("host key not found in known_hosts");
                Ok(false)
            }
            Err(russh::keys::Error::KeyChanged { .. }) => {
                tracing::error!("host key changed since it was recorded in known_hosts");
                Ok(false)
            }
            Err(e) => {
                tracing::error!("host key verification failed: {}", e);
                Ok(false)
            }
        }
    }
}

/// Authentication method resolved from config.
enum AuthMethod {
    Agent(AgentClient<UnixStream>),
    KeyFile(Arc<ssh_key::PrivateKey>),
}

/// An established SSH session.
pub struct Session {
    config: SessionConfig,
    handle: Handle<SshHandler>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("handle", &"<russh::Handle>")
            .finish()
    }
}

impl Session {
    /// Connect and authenticate to the remote host.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let auth_method = Self::resolve_auth_method(&config).await?;

        let russh_config = Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            trust_on_first_use: config.trust_on_first_use,
            known_hosts_path: config.known_hosts_path.clone(),
        };

        let mut handle = client::connect(
            Arc::new(russh_config),
            (config.host.as_str(), config.port),
            handler,
        )
        .await
        .map_err(|e| {
            if e.to_string().contains("Connection refused") {
                Error::Connection(format!("connection refused on port {}", config.port))
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        if !Self::authenticate(&mut handle, &config, auth_method).await? {
            return Err(Error::AuthenticationFailed);
        }

        Ok(Self { config, handle })
    }

    async fn resolve_auth_method(config: &SessionConfig) -> Result<AuthMethod> {
        if let Some(key_path) = &config.key_path {
            let key = load_secret_key(key_path, None).map_err(|e| Error::KeyLoadFailed {
                path: key_path.clone(),
                reason: e.to_string(),
            })?;
            return Ok(AuthMethod::KeyFile(Arc::new(key)));
        }

        if let Ok(agent) = AgentClient::connect_env().await {
            return Ok(AuthMethod::Agent(agent));
        }

        let home = std::env::var("HOME").map_err(|_| {
            Error::AgentUnavailable("SSH agent not available and HOME not set".to_string())
        })?;

        for name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
            let key_path = Path::new(&home).join(".ssh").join(name);
            if let Ok(key) = load_secret_key(&key_path, None) {
                return Ok(AuthMethod::KeyFile(Arc::new(key)));
            }
        }

        Err(Error::AgentUnavailable(
            "SSH agent not available and no default keys found".to_string(),
        ))
    }

    async fn authenticate(
        handle: &mut Handle<SshHandler>,
        config: &SessionConfig,
        auth_method: AuthMethod,
    ) -> Result<bool> {
        match auth_method {
            AuthMethod::Agent(mut agent) => {
                let keys = agent.request_identities().await.map_err(|e| {
                    Error::AgentUnavailable(format!("failed to list agent keys: {}", e))
                })?;

                if keys.is_empty() {
                    return Err(Error::AgentUnavailable("no keys in SSH agent".to_string()));
                }

                for key in &keys {
                    match handle
                        .authenticate_publickey_with(&config.user, key.clone(), None, &mut agent)
                        .await
                    {
                        Ok(result) if result.success() => return Ok(true),
                        _ => continue,
                    }
                }
                Ok(false)
            }
            AuthMethod::KeyFile(key) => {
                let hash_alg = handle
                    .best_supported_rsa_hash()
                    .await
                    .map_err(Error::Protocol)?
                    .flatten();

                let result = handle
                    .authenticate_publickey(&config.user, PrivateKeyWithHashAlg::new(key, hash_alg))
                    .await
                    .map_err(Error::Protocol)?;

                Ok(result.success())
            }
        }
    }

    /// Execute a command on the remote host with the configured timeout.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        let timeout = self.config.command_timeout;
        match tokio::time::timeout(timeout, self.exec_inner(command)).await {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        }
    }

    async fn exec_inner(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self.open_channel().await?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to exec command: {}", e)))?;

        collect_output(&mut channel).await
    }

    /// Stream a local file to `remote`.
    ///
    /// The bytes go to `<remote>.partial` first and are renamed into place only
    /// after the remote side acknowledged the whole stream.
    pub async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        let partial = format!("{remote}.partial");
        let command = format!(
            "cat > {partial} && mv -f {partial} {remote}",
            partial = quote(&partial),
            remote = quote(remote),
        );

        let timeout = self.config.command_timeout;
        let result = match tokio::time::timeout(timeout, self.upload_inner(local, &command)).await
        {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        };

        if result.is_err() {
            let _ = self.exec(&format!("rm -f {}", quote(&partial))).await;
        }
        result
    }

    async fn upload_inner(&self, local: &Path, command: &str) -> Result<()> {
        let file = tokio::fs::File::open(local).await?;
        let mut channel = self.open_channel().await?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::UploadFailed(format!("failed to start remote writer: {}", e)))?;
        channel
            .data(file)
            .await
            .map_err(|e| Error::UploadFailed(format!("failed to stream archive: {}", e)))?;
        channel
            .eof()
            .await
            .map_err(|e| Error::UploadFailed(format!("failed to finish stream: {}", e)))?;

        let output = collect_output(&mut channel).await?;
        if !output.success() {
            return Err(Error::UploadFailed(format!(
                "remote writer exited with code {}: {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    async fn open_channel(&self) -> Result<Channel<Msg>> {
        self.handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to open channel: {}", e)))
    }

    /// Disconnect the session.
    pub async fn disconnect(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(Error::Protocol)?;
        Ok(())
    }
}

/// Drain a channel until it reports both EOF and an exit status.
async fn collect_output(channel: &mut Channel<Msg>) -> Result<CommandOutput> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_code = None;
    let mut got_eof = false;

    loop {
        match channel.wait().await {
            Some(ChannelMsg::Data { data }) => stdout.extend_from_slice(&data),
            // ext 1 is stderr
            Some(ChannelMsg::ExtendedData { data, ext: 1 }) => stderr.extend_from_slice(&data),
            Some(ChannelMsg::ExitStatus { exit_status }) => {
                exit_code = Some(exit_status);
                if got_eof {
                    break;
                }
            }
            Some(ChannelMsg::Eof) => {
                got_eof = true;
                if exit_code.is_some() {
                    break;
                }
            }
            Some(ChannelMsg::Close) | None => break,
            Some(_) => {}
        }
    }

    // No exit status means the channel died (timeout, network issue).
    let exit_code = exit_code.ok_or(Error::ChannelClosed)?;

    Ok(CommandOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
    })
}
