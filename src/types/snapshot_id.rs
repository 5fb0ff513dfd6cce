// ABOUTME: Timestamp-derived snapshot identifiers.
// ABOUTME: Encodes creation time in the archive file name so ordering survives listing.

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use std::fmt;
use thiserror::Error;

const PREFIX: &str = "backup-";
const SUFFIX: &str = ".tar.gz";
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotIdError {
    #[error("not a snapshot archive name: {0}")]
    NotSnapshot(String),

    #[error("invalid snapshot timestamp in {0}")]
    InvalidTimestamp(String),
}

/// Identifier of a snapshot archive, e.g. `backup-20261019-101530-042.tar.gz`.
///
/// Ordering follows the embedded creation time (millisecond precision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId {
    created_at: DateTime<Utc>,
}

impl SnapshotId {
    /// Snapshot id for the given creation time, truncated to milliseconds.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            created_at: time.trunc_subsecs(3),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// The smallest id strictly greater than `self`.
    pub fn successor(&self) -> Self {
        Self {
            created_at: self.created_at + TimeDelta::milliseconds(1),
        }
    }

    /// Parse an archive file name produced by [`SnapshotId::file_name`].
    pub fn parse_file_name(name: &str) -> Result<Self, SnapshotIdError> {
        let stamp = name
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(SUFFIX))
            .ok_or_else(|| SnapshotIdError::NotSnapshot(name.to_string()))?;

        let invalid = || SnapshotIdError::InvalidTimestamp(name.to_string());

        let (seconds, millis) = stamp.rsplit_once('-').ok_or_else(invalid)?;
        if millis.len() != 3 {
            return Err(invalid());
        }
        let millis: i64 = millis.parse().map_err(|_| invalid())?;
        let naive = NaiveDateTime::parse_from_str(seconds, STAMP_FORMAT).map_err(|_| invalid())?;

        Ok(Self {
            created_at: naive.and_utc() + TimeDelta::milliseconds(millis),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{PREFIX}{self}{SUFFIX}")
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:03}",
            self.created_at.format(STAMP_FORMAT),
            self.created_at.timestamp_subsec_millis()
        )
    }
}
