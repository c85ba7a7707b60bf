use thiserror::Error;

/// Errors that abort a simulation run
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A command that must name a known creature pointed at nobody
    #[error("cannot resolve `{token}` in command `{command}`")]
    IdentityResolution { token: String, command: String },
}
