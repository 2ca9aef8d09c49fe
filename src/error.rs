//! Error types for the capture pipeline.
//!
//! Nothing in this crate is fatal to the host: every capture entry point
//! returns a [`Result`] and the hook boundary discards the error variant
//! after logging it (see [`crate::capture::absorb`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record or pointer could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The local config frontmatter is malformed
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// No current session could be resolved
    #[error("No current session")]
    NoSession,

    /// A host-supplied session id cannot be used as a directory name
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
