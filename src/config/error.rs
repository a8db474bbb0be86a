use std::io;

use thiserror::Error;

use super::de::DeserializeError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("malformed section header on line {line}: {text:?}")]
    MalformedSectionHeader { line: usize, text: String },

    #[error("expected `key = value` on line {line}: {text:?}")]
    MalformedAssignment { line: usize, text: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to deserialize section '{section}': {source}")]
    Deserialize {
        section: String,
        source: DeserializeError,
    },
}

impl ConfigError {
    /// Returns `true` if the error came from opening a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        self.io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    }

    /// The underlying I/O error, if the load failed while reading.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }

    /// The 1-based source line of a structural error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedSectionHeader { line, .. } | Self::MalformedAssignment { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}
