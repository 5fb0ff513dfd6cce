// ABOUTME: Release record bundled into every artifact.
// ABOUTME: Lets the deployed tree answer which build it came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ArtifactVersion;

/// File name of the record inside the bundle (and so inside the deployed root).
pub const RELEASE_RECORD: &str = ".caravel-release.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub app: String,
    pub version: String,
    pub commit: Option<String>,
    pub built_at: DateTime<Utc>,
    pub built_on: String,
}

impl ReleaseRecord {
    pub fn new(app: &str, version: &ArtifactVersion) -> Self {
        Self {
            app: app.to_string(),
            version: version.to_string(),
            commit: version.commit.clone(),
            built_at: version.built_at,
            built_on: gethostname::gethostname().to_string_lossy().into_owned(),
        }
    }
}
