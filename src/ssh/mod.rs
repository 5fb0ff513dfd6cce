// ABOUTME: SSH transport to the target host.
// ABOUTME: Key-based authentication with known_hosts verification and scoped credential files.

mod client;
mod credential;
mod error;
mod transport;

pub use client::{Session, SessionConfig};
pub use credential::CredentialFile;
pub use error::{Error, Result};
pub use transport::{SshConnector, Transport};
