// ABOUTME: Snapshots command implementation.
// ABOUTME: Lists snapshot archives on the target host, newest first.

use super::target;
use caravel::config::Config;
use caravel::error::Result;
use caravel::host::Connector;
use caravel::output::Output;
use caravel::snapshot::{Snapshot, SnapshotManager};

pub async fn snapshots(config: Config, local: bool, output: Output) -> Result<()> {
    let listed = if local {
        let (connector, _) = target::local_connector(&config);
        list(&config, &connector).await?
    } else {
        let (connector, _) = target::ssh_connector(&config)?;
        list(&config, &connector).await?
    };

    if listed.is_empty() {
        output.progress("No snapshots");
        return Ok(());
    }

    for snapshot in &listed {
        output.item(&format!(
            "{}  {}",
            snapshot.id,
            snapshot.id.created_at().to_rfc3339()
        ));
    }
    Ok(())
}

async fn list<C: Connector>(config: &Config, connector: &C) -> Result<Vec<Snapshot>> {
    let host = connector.connect().await?;
    let result = SnapshotManager::new(&host, config)
        .list()
        .await;

    if let Err(e) = connector.disconnect(host).await {
        tracing::warn!("disconnect failed: {}", e);
    }
    Ok(result?)
}
