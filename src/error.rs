//! Error types for the negotiation agent.

use thiserror::Error;

/// Errors raised while loading a buyer persona.
///
/// Persona problems are fatal: a session must not start with a missing or
/// malformed persona file.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// The persona file could not be read.
    #[error("failed to read persona config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The persona file is not valid JSON or has the wrong shape.
    #[error("failed to parse persona config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
