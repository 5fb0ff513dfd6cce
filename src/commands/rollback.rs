// ABOUTME: Rollback command implementation.
// ABOUTME: Restores the latest snapshot outside a deployment and reloads from it.

use super::target;
use caravel::config::Config;
use caravel::deploy::{RollbackOutcome, manual_rollback};
use caravel::diagnostics::Diagnostics;
use caravel::error::{Error, Result};
use caravel::output::Output;

pub async fn rollback(config: Config, local: bool, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();
    let reloader = target::reloader(&config);

    output.progress(&format!("Rolling back {}", config.app));

    let result = if local {
        let (connector, _) = target::local_connector(&config);
        manual_rollback(&config, &connector, &reloader, &mut diag).await
    } else {
        let (connector, _) = target::ssh_connector(&config)?;
        manual_rollback(&config, &connector, &reloader, &mut diag).await
    };

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match result? {
        RollbackOutcome::Restored(id) => {
            output.success(&format!("Rolled back to snapshot {id}"));
            Ok(())
        }
        RollbackOutcome::NoSnapshot => Err(Error::NoSnapshot),
    }
}
