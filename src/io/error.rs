use super::Section;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {section} section: {details} (at line ~{line})")]
    Parse {
        section: Section,
        line: usize,
        details: String,
    },

    #[error("malformed section structure: {details} (at line ~{line})")]
    Structure { line: usize, details: String },

    #[error("required {0} section is missing")]
    MissingSection(Section),

    #[error("unsupported particle-set version '{0}'")]
    UnsupportedVersion(String),
}

impl Error {
    pub fn parse(section: Section, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            section,
            line,
            details: details.into(),
        }
    }

    pub fn structure(line: usize, details: impl Into<String>) -> Self {
        Self::Structure {
            line,
            details: details.into(),
        }
    }
}
