// ABOUTME: Artifact builder: compiles the source tree and packages a versioned bundle.
// ABOUTME: Bundles are gzip-compressed tarballs that are never modified once written.

mod builder;
mod error;
mod record;

pub use builder::{Artifact, ArtifactBuilder, detect_commit};
pub use error::{BuildError, BuildErrorKind};
pub use record::{RELEASE_RECORD, ReleaseRecord};
