//! Error types for the RouteTrace environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Context operation failed
    #[error("Context error: {0}")]
    ContextError(String),

    /// Nobody is listening on a teardown channel any more
    #[error("Teardown channel closed: {0}")]
    TeardownClosed(String),
}

impl EnvError {
    /// Creates a context error.
    pub fn context(msg: impl Into<String>) -> Self {
        Self::ContextError(msg.into())
    }
}
