//! Failures of the version-query mechanism itself

use std::time::Duration;
use thiserror::Error;

/// The query or install mechanism could not run at all
///
/// "Package not installed" or "registry has no such package" are not
/// failures; oracles report those as `Ok(None)`.
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid registry URL `{url}`: {reason}")]
    InvalidRegistry { url: String, reason: String },

    #[error("{operation} timed out after {} seconds", .limit.as_secs())]
    TimedOut {
        operation: &'static str,
        limit: Duration,
    },
}

impl QueryFailure {
    pub(crate) fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }
}
