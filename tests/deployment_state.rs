// ABOUTME: Tests for deployment state types and type state pattern.
// ABOUTME: Walks a deployment through every state and checks the data each one carries.

mod support;

use caravel::deploy::{DeployError, Deployment, Initialized};
use caravel::diagnostics::Diagnostics;
use caravel::health::HealthVerifier;
use caravel::host::LocalHost;
use caravel::supervisor::{ProcessReloader, ReloadOutcome};
use std::mem::size_of;
use std::path::Path;
use support::{FakeSupervisor, Project, ScriptedProbe};

#[test]
fn initialized_marker_is_zero_sized() {
    assert_eq!(size_of::<Initialized>(), 0);
}

#[test]
fn new_deployment_exposes_config() {
    let project = Project::new();
    let deployment = Deployment::new(project.config());

    assert_eq!(deployment.app().as_str(), "shop");
    assert_eq!(
        deployment.config().remote.root,
        project.root().to_str().unwrap()
    );
    let debug = format!("{deployment:?}");
    assert!(debug.contains("Initialized"));
}

#[tokio::test]
async fn deployment_walks_every_state() {
    support::init_tracing();
    let project = Project::new();
    let host = LocalHost::default();
    let reloader = ProcessReloader::new(FakeSupervisor::default());
    let config = project.config();
    let verifier = HealthVerifier::new(
        ScriptedProbe::default(),
        "http://127.0.0.1:9/",
        &config.healthcheck,
    );
    verifier.probe().push(&[302]);
    let mut diag = Diagnostics::default();

    let built = Deployment::new(config).build(project.source.path()).await.unwrap();
    assert!(built.artifact().path.exists());
    assert!(built.artifact().size > 0);

    let delivered = built.deliver(&host).await.unwrap();
    assert!(delivered.remote_archive().ends_with(".tar.gz"));
    assert!(Path::new(delivered.remote_archive()).exists());

    let released = delivered.release(&host, &mut diag).await.unwrap();
    assert!(released.release_report().env_created);
    assert_eq!(released.release_report().snapshot, None);
    assert_eq!(project.deployed_version(), "v1");

    let reloaded = released.reload(&host, &reloader).await.unwrap();
    assert_eq!(reloaded.reload_outcome(), ReloadOutcome::Started);

    let verified = reloaded.verify(&verifier).await.unwrap();
    assert_eq!(verified.health_status(), 302);
    assert_eq!(verified.reload_outcome(), ReloadOutcome::Started);

    let state = verified.finish();
    assert!(format!("{state:?}").contains("Verified"));
}

#[tokio::test]
async fn failed_health_check_hands_back_reloaded_deployment() {
    let project = Project::new();
    let host = LocalHost::default();
    let reloader = ProcessReloader::new(FakeSupervisor::default());
    let config = project.config();
    let verifier = HealthVerifier::new(
        ScriptedProbe::default(),
        "http://127.0.0.1:9/",
        &config.healthcheck,
    );
    let mut diag = Diagnostics::default();

    let reloaded = Deployment::new(config)
        .build(project.source.path())
        .await
        .unwrap()
        .deliver(&host)
        .await
        .unwrap()
        .release(&host, &mut diag)
        .await
        .unwrap()
        .reload(&host, &reloader)
        .await
        .unwrap();

    let (reloaded, err) = reloaded.verify(&verifier).await.unwrap_err();

    assert!(matches!(err, DeployError::HealthCheck(ref f) if f.attempts == 2));
    assert!(err.is_post_release());
    assert_eq!(reloaded.reload_outcome(), ReloadOutcome::Started);
}
