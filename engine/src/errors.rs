//! Error types and handling
//!
//! Top-level error type for engine startup: configuration and credential
//! faults. Request-level faults live elsewhere: backend transport
//! failures are `llm::GeneratorError`, and tool faults are never errors at
//! all (they come back as strings a branch embeds into its response).

use thiserror::Error;

/// Errors raised while bringing the engine up
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file missing required data or failed to parse
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required credential not present in the environment
    #[error("Missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),

    /// Filesystem fault while reading or writing the configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
