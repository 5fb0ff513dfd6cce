// ABOUTME: RemoteHost implementation over an authenticated SSH session.
// ABOUTME: Owns the transient credential file for exactly the lifetime of the session.

use async_trait::async_trait;
use std::path::Path;

use super::{CredentialFile, Error, Result, Session, SessionConfig};
use crate::config::ResolvedServer;
use crate::host::{CommandOutput, Connector, HostError, RemoteHost};

/// One remote-access step: an SSH session plus the key file it authenticated with.
///
/// Field order matters: the session is torn down before the credential file is removed.
#[derive(Debug)]
pub struct Transport {
    session: Session,
    _credential: Option<CredentialFile>,
}

impl Transport {
    /// Write the credential (if any), connect, and authenticate.
    ///
    /// The credential file is removed on every exit path, including a failed
    /// connection attempt.
    pub async fn connect(server: &ResolvedServer) -> Result<Self> {
        let credential = server
            .key
            .as_ref()
            .map(CredentialFile::write)
            .transpose()
            .map_err(Error::CredentialWrite)?;

        let mut config = SessionConfig::new(server.host.expose(), server.user.expose())
            .port(server.port)
            .trust_on_first_use(server.trust_first_connection)
            .command_timeout(server.command_timeout);
        if let Some(ref credential) = credential {
            config = config.key_path(credential.path());
        }
        if let Some(ref known_hosts) = server.known_hosts {
            config = config.known_hosts_path(known_hosts);
        }

        tracing::debug!(port = server.port, "opening SSH session");
        let session = Session::connect(config).await?;

        Ok(Self {
            session,
            _credential: credential,
        })
    }

    /// Close the session, then remove the credential file.
    pub async fn disconnect(self) -> Result<()> {
        let Transport {
            session,
            _credential: credential,
        } = self;
        let result = session.disconnect().await;
        drop(credential);
        result
    }
}

#[async_trait]
impl RemoteHost for Transport {
    async fn exec(&self, command: &str) -> std::result::Result<CommandOutput, HostError> {
        Ok(self.session.exec(command).await?)
    }

    async fn upload(&self, local: &Path, remote: &str) -> std::result::Result<(), HostError> {
        Ok(self.session.upload(local, remote).await?)
    }
}

/// Connector that opens a fresh [`Transport`] per remote-access step.
#[derive(Debug, Clone)]
pub struct SshConnector {
    server: ResolvedServer,
}

impl SshConnector {
    pub fn new(server: ResolvedServer) -> Self {
        Self { server }
    }
}

#[async_trait]
impl Connector for SshConnector {
    type Host = Transport;

    async fn connect(&self) -> std::result::Result<Transport, HostError> {
        Ok(Transport::connect(&self.server).await?)
    }

    async fn disconnect(&self, host: Transport) -> std::result::Result<(), HostError> {
        Ok(host.disconnect().await?)
    }
}
