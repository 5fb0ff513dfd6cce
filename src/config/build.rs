// ABOUTME: Artifact build settings.
// ABOUTME: Build command, output directory, packaged paths, and local artifact retention.

use nonempty::{NonEmpty, nonempty};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Shell command run in the source directory. Empty skips compilation.
    #[serde(default = "default_command")]
    pub command: String,

    /// Directory the build command produces; also marks a prior deploy on the host.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Paths that must exist and are always packaged.
    #[serde(default = "default_include")]
    pub include: NonEmpty<String>,

    /// Paths packaged only when present (environment template and similar).
    #[serde(default = "default_optional")]
    pub optional: Vec<String>,

    /// Where bundles are written, relative to the source directory.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    #[serde(default = "default_keep_artifacts")]
    pub keep_artifacts: usize,
}

fn default_command() -> String {
    "npm ci && npm run build".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_include() -> NonEmpty<String> {
    nonempty![
        "dist".to_string(),
        "src".to_string(),
        "package.json".to_string(),
        "package-lock.json".to_string(),
        "ecosystem.config.js".to_string()
    ]
}

fn default_optional() -> Vec<String> {
    vec![".env.example".to_string()]
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".caravel/artifacts")
}

fn default_keep_artifacts() -> usize {
    3
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            command: default_command(),
            output_dir: default_output_dir(),
            include: default_include(),
            optional: default_optional(),
            artifact_dir: default_artifact_dir(),
            keep_artifacts: default_keep_artifacts(),
        }
    }
}
