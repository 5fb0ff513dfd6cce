// ABOUTME: Supervisor-safe application process name.
// ABOUTME: Restricts names to characters usable unquoted in file names and supervisor commands.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessNameError {
    #[error("process name cannot be empty")]
    Empty,

    #[error("process name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("process name must start with a letter or digit")]
    InvalidStart,

    #[error("invalid character in process name: '{0}'")]
    InvalidChar(char),
}

/// Name of the single application process under supervision.
///
/// Also used as the artifact file name prefix, so the character set is kept
/// to ASCII alphanumerics, `-`, `_` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessName(String);

impl ProcessName {
    pub fn new(value: &str) -> Result<Self, ProcessNameError> {
        if value.is_empty() {
            return Err(ProcessNameError::Empty);
        }

        if value.len() > 63 {
            return Err(ProcessNameError::TooLong);
        }

        if !value.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(ProcessNameError::InvalidStart);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
        {
            return Err(ProcessNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
