//! Error types for the device library model.

use thiserror::Error;

/// Errors raised while parsing or serializing library documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The document is not valid YAML or does not match the expected shape.
    #[error("invalid {document}: {reason}")]
    Parse {
        /// Which kind of document was being parsed (e.g. "device file").
        document: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A configuration section was not a keyed mapping.
    #[error("{section} must be a mapping, found {found}")]
    NotAMapping {
        /// Section name.
        section: String,
        /// YAML type that was found instead.
        found: &'static str,
    },

    /// Serialization back to YAML failed.
    #[error("failed to serialize {document}: {reason}")]
    Serialize {
        /// Which kind of document was being serialized.
        document: &'static str,
        /// Serializer message.
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn parse(document: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            document,
            reason: err.to_string(),
        }
    }

    pub(crate) fn serialize(document: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Serialize {
            document,
            reason: err.to_string(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
