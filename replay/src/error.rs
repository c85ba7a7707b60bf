use std::fmt;

use scout_battle::SimulationError;
use thiserror::Error;

/// One failed way of reading a replay, and why it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub attempt: String,
    pub reason: String,
}

impl AttemptFailure {
    pub fn new(attempt: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            attempt: attempt.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attempt, self.reason)
    }
}

fn join_failures(failures: &[AttemptFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors reading or normalizing a replay source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input was read but no attempt found a battle log in it
    #[error("no battle log found ({})", join_failures(.failures))]
    Format { failures: Vec<AttemptFailure> },

    /// The input could not be retrieved (network, timeout, unreadable file)
    #[error("failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },
}

impl SourceError {
    pub fn format(attempt: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Format {
            failures: vec![AttemptFailure::new(attempt, reason)],
        }
    }

    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        SourceError::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Coarse failure category, for exit codes and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Fetch,
    IdentityResolution,
}

/// Any error of the full replay pipeline
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

impl ReplayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReplayError::Source(SourceError::Format { .. }) => ErrorKind::Format,
            ReplayError::Source(SourceError::Fetch { .. }) => ErrorKind::Fetch,
            ReplayError::Simulation(SimulationError::IdentityResolution { .. }) => {
                ErrorKind::IdentityResolution
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_lists_attempts() {
        let error = SourceError::Format {
            failures: vec![
                AttemptFailure::new("replays-call", "no call"),
                AttemptFailure::new("json-endpoint", "404"),
            ],
        };

        assert_eq!(
            error.to_string(),
            "no battle log found (replays-call: no call; json-endpoint: 404)"
        );
    }

    #[test]
    fn test_error_kind() {
        let error: ReplayError = SourceError::fetch("https://x", "timed out").into();
        assert_eq!(error.kind(), ErrorKind::Fetch);

        let error: ReplayError = SimulationError::IdentityResolution {
            token: "p1a: X".to_string(),
            command: "|faint|p1a: X".to_string(),
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::IdentityResolution);
    }
}
