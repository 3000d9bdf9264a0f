//! Error types for fixture generation, mapping and report rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Failure raised by a single mapping invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A nested value required by the destination shape was absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The mechanism could not convert the source into the destination type.
    #[error("conversion failed: {0}")]
    Conversion(String),
}

/// Errors surfaced by the harness.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The random source or the generated fixture is unusable. Fatal.
    #[error("fixture generation failed: {0}")]
    FixtureGeneration(String),

    /// One invocation of one strategy failed.
    #[error("strategy `{name}` failed: {source}")]
    Strategy {
        name: String,
        #[source]
        source: MapError,
    },

    /// The report destination could not be written.
    #[error("failed to write report to {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The report destination has an extension no renderer handles.
    #[error("unsupported report format for {} (expected .html, .md or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// JSON or bincode encoding failed.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for BenchError {
    fn from(e: serde_json::Error) -> Self {
        BenchError::Serialize(e.to_string())
    }
}

impl From<bincode::Error> for BenchError {
    fn from(e: bincode::Error) -> Self {
        BenchError::Serialize(e.to_string())
    }
}
