// ABOUTME: Deploy command implementation.
// ABOUTME: Wires transport, supervisor, and health probe into the pipeline.

use super::target;
use caravel::config::Config;
use caravel::deploy::{DeployReport, Pipeline};
use caravel::diagnostics::Diagnostics;
use caravel::error::Result;
use caravel::health::{HealthVerifier, HyperProbe};
use caravel::host::Connector;
use caravel::output::Output;
use caravel::types::Secret;
use std::path::{Path, PathBuf};

pub async fn deploy(config: Config, source: PathBuf, local: bool, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} to {}",
        config.app, config.remote.root
    ));

    let result = if local {
        let (connector, address) = target::local_connector(&config);
        run(&config, &connector, &address, &source, &output, &mut diag).await
    } else {
        let (connector, address) = target::ssh_connector(&config)?;
        run(&config, &connector, &address, &source, &output, &mut diag).await
    };

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let report = result?;
    output.success(&format!(
        "Deployed {} ({}, health {})",
        report.artifact.version, report.outcome, report.status
    ));
    Ok(())
}

async fn run<C: Connector>(
    config: &Config,
    connector: &C,
    address: &Secret,
    source: &Path,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<DeployReport> {
    let reloader = target::reloader(config);
    let verifier = HealthVerifier::new(
        HyperProbe::new(config.healthcheck.timeout),
        config.health_url(address),
        &config.healthcheck,
    );

    let pipeline = Pipeline::new(config, connector, &reloader, &verifier, output);
    Ok(pipeline.run(source, diag).await?)
}
