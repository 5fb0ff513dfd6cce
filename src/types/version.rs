// ABOUTME: Artifact identity derived from build time and source commit.
// ABOUTME: Rendered into artifact file names and the bundled release record.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_COMMIT_LEN: usize = 12;

/// Version of a built artifact: UTC build timestamp plus the commit if known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub built_at: DateTime<Utc>,
    pub commit: Option<String>,
}

impl ArtifactVersion {
    pub fn new(built_at: DateTime<Utc>, commit: Option<&str>) -> Self {
        let commit = commit
            .map(|c| {
                c.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .take(MAX_COMMIT_LEN)
                    .collect::<String>()
            })
            .filter(|c| !c.is_empty());

        Self {
            built_at: built_at.trunc_subsecs(0),
            commit,
        }
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.built_at.format("%Y%m%d-%H%M%S"))?;
        if let Some(ref commit) = self.commit {
            write!(f, "-{}", commit)?;
        }
        Ok(())
    }
}
