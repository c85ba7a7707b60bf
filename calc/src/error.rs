use std::time::Duration;

use thiserror::Error;

/// Failures talking to an external damage calculator
///
/// The calculator's own messages are passed through unchanged.
#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("failed to run damage calculator: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("damage calculator timed out after {0:?}")]
    Timeout(Duration),

    #[error("damage calculator failed: {0}")]
    Failed(String),

    #[error("invalid damage calculator JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
