//! Particle-set file codec.
//!
//! A particle-set file is line oriented and divided into tagged sections
//! (`[TAG]` ... `[/TAG]`). Lines starting with the comment prefix are kept
//! verbatim but carry no data. [`Document`] is the lossless line model used
//! by the editor, [`read`] / [`read_path`] decode a file into
//! [`ParticleSetData`] for the store.

use std::fmt;

pub mod document;
pub mod error;
pub mod reader;

pub use document::{Document, Line, LineKind};
pub use error::Error;
pub use reader::{
    AminoAcidRecord, InteractionRecord, ParticleRecord, ParticleSetData, SUPPORTED_VERSION,
    decode, read, read_path,
};

/// Sections of a particle-set file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Version,
    ParticleDescription,
    ParticleInteractions,
    AminoAcidDescription,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Version,
        Section::ParticleDescription,
        Section::ParticleInteractions,
        Section::AminoAcidDescription,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Version => "version",
            Section::ParticleDescription => "particle description",
            Section::ParticleInteractions => "particle interactions",
            Section::AminoAcidDescription => "amino acid description",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
