//! Error types for particle-set store operations.

use thiserror::Error;

/// Errors raised by [`ParticleSet`](super::ParticleSet) mutations and lookups.
///
/// Expected no-op outcomes (a code that already exists, the last-particle
/// guard) are reported through `bool` results instead.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument does not name a known particle or is otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An amino acid's code or name is already bound to a different entry.
    #[error(
        "amino acid '{code}' ({name}) conflicts with an existing amino-acid definition"
    )]
    CorruptAminoAcid {
        /// One-letter code of the rejected entry.
        code: String,
        /// Full name of the rejected entry.
        name: String,
    },
}

impl Error {
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    pub fn unknown_particle(code: &str) -> Self {
        Self::InvalidArgument(format!("unknown particle '{code}'"))
    }
}
