// ABOUTME: Capability seam for running commands and copying files on the target host.
// ABOUTME: Exports the RemoteHost/Connector traits, the local implementation, and fail-fast scripts.

mod error;
mod local;
mod script;
mod traits;

pub use error::HostError;
pub use local::{LocalConnector, LocalHost};
pub use script::{Script, ScriptError, quote};
pub use traits::{CommandOutput, Connector, RemoteHost};
