// ABOUTME: Build command implementation.
// ABOUTME: Packages the artifact locally without touching the target host.

use caravel::artifact::ArtifactBuilder;
use caravel::config::Config;
use caravel::error::Result;
use caravel::output::Output;
use std::path::PathBuf;

pub async fn build(config: Config, source: PathBuf, mut output: Output) -> Result<()> {
    output.start_timer();
    output.progress(&format!("Building {}", config.app));

    let artifact = ArtifactBuilder::new(config.app.clone(), config.build.clone())
        .build(&source)
        .await?;

    output.success(&format!(
        "Built {} ({})",
        artifact.path.display(),
        artifact.version
    ));
    Ok(())
}
