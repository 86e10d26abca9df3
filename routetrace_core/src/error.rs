//! Error types for the RouteTrace core.

use routetrace_env::EnvError;
use thiserror::Error;

/// Errors surfaced by the tracker and its collaborators.
///
/// Interpolation and stepping never fail; these cover configuration,
/// the presentation surface and the environment.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Configuration rejected by `TrackerConfig::validate`
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The driver refused to start because the surface is not ready
    #[error("Presentation surface is not ready")]
    SurfaceNotReady,

    /// A surface call failed
    #[error("Surface error: {0}")]
    Surface(String),

    /// Operation attempted after teardown
    #[error("Tracker has been torn down")]
    TornDown,

    /// Environment layer failure
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TrackerError {
    /// Creates an invalid-config error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a surface error.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}
