//! Error types for particle-set editing operations.

use crate::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons an editing operation did not produce a new particle-set file.
#[derive(Debug, Error)]
pub enum Error {
    /// The rewritten file could not be written.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The current file could not be read, or the rewritten document no
    /// longer decodes.
    #[error(transparent)]
    Document(#[from] io::Error),

    /// The request itself is unusable (bad filename, bad code, nothing
    /// selected).
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("unknown particle '{0}'")]
    UnknownParticle(String),

    /// Removing the requested particles would leave the set empty.
    #[error("cannot remove '{0}': at least one particle must remain")]
    LastParticle(String),

    /// Cross interactions cannot be corrected without a self-interaction row.
    #[error("particle '{0}' has no self-interaction row to correct against")]
    MissingDiagonal(String),

    /// A numeric token of the current file cannot be used.
    #[error("invalid value at line {line}: {details}")]
    InvalidValue { line: usize, details: String },

    #[error("no probe particle can be incremented")]
    NothingToIncrement,

    #[error("no free output filename for '{filename}' after {attempts} attempts")]
    NoFreeFilename { filename: String, attempts: usize },
}

impl Error {
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedRequest(details.into())
    }

    pub fn invalid_value(line: usize, details: impl Into<String>) -> Self {
        Self::InvalidValue {
            line,
            details: details.into(),
        }
    }
}
