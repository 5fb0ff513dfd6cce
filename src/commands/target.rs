// ABOUTME: Shared wiring for commands that talk to the target host.
// ABOUTME: Picks SSH or local transport and builds the pm2-backed reloader.

use caravel::config::Config;
use caravel::error::Result;
use caravel::host::LocalConnector;
use caravel::ssh::SshConnector;
use caravel::supervisor::{Pm2, ProcessReloader};
use caravel::types::Secret;

/// Address used for the default health URL when deploying locally.
const LOCAL_ADDRESS: &str = "127.0.0.1";

pub fn reloader(config: &Config) -> ProcessReloader<Pm2> {
    ProcessReloader::new(Pm2::new(&config.supervisor, config.remote.root.clone()))
}

pub fn local_connector(config: &Config) -> (LocalConnector, Secret) {
    (
        LocalConnector::new(config.server.command_timeout),
        Secret::new(LOCAL_ADDRESS),
    )
}

/// SSH connector plus the host address (for the default health URL).
pub fn ssh_connector(config: &Config) -> Result<(SshConnector, Secret)> {
    let server = config.server.resolve()?;
    let host = server.host.clone();
    Ok((SshConnector::new(server), host))
}
