// ABOUTME: Process supervisor seam and the start-or-reload decision.
// ABOUTME: Supervisor is the capability trait; Pm2 drives pm2 on the target host.

mod pm2;
mod reloader;
mod traits;

pub use pm2::Pm2;
pub use reloader::{ProcessReloader, ProcessState, ReloadOutcome};
pub use traits::{ProcessPresence, Supervisor, SupervisorError};
