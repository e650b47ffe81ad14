//! Application error types.
//!
//! Two layers of failure exist in the editor:
//!
//! - [`EditError`]: a field edit was rejected. Nothing is mutated and the
//!   message goes to the status line.
//! - [`AppError`]: a backend or publish failure. These switch to the error
//!   view and keep every unsaved change.

use spark_model::ModelError;
use spark_source::SourceError;
use thiserror::Error;

// =============================================================================
// EDIT ERRORS
// =============================================================================

/// A rejected field edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditError {
    /// Value is not one of the field's options.
    #[error("'{value}' is not a valid {field} (expected one of: {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// Value is not a number of the expected kind.
    #[error("'{value}' is not a valid {field}: {reason}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Number outside the allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: i64,
        max: i64,
    },

    /// Section text is not valid YAML or not a mapping.
    #[error("invalid {section}: {reason}")]
    Section {
        section: &'static str,
        reason: String,
    },

    /// The technology section lost its discriminator.
    #[error("technology_config must contain 'technology' with one of: {expected}")]
    MissingTechnology { expected: String },

    /// The field opens a sub-view and cannot be assigned.
    #[error("{field} cannot be edited directly")]
    NotEditable { field: &'static str },

    /// Nothing is selected to edit.
    #[error("nothing selected")]
    NoSelection,
}

impl EditError {
    /// Create an invalid-choice error for `value`.
    pub fn invalid_choice(field: &'static str, value: &str, options: &[&str]) -> Self {
        Self::InvalidChoice {
            field,
            value: value.to_string(),
            expected: options.join(", "),
        }
    }

    /// Create an invalid-number error.
    pub fn invalid_number(field: &'static str, value: &str, err: impl std::fmt::Display) -> Self {
        Self::InvalidNumber {
            field,
            value: value.to_string(),
            reason: err.to_string(),
        }
    }

    /// Create a section error from a model error.
    pub fn section(section: &'static str, err: &ModelError) -> Self {
        Self::Section {
            section,
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// APPLICATION ERRORS
// =============================================================================

/// Errors shown in the error view.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Loading the manifest failed.
    #[error("Failed to load manifest: {0}")]
    IndexLoad(#[source] SourceError),

    /// Loading a vendor file failed.
    #[error("Failed to load {path}: {source}")]
    CollectionLoad {
        path: String,
        #[source]
        source: SourceError,
    },

    /// Publishing failed in the backend.
    #[error("Failed to publish: {0}")]
    Publish(#[source] SourceError),

    /// Publishing failed before anything was sent.
    #[error(transparent)]
    Prepare(#[from] PublishError),
}

impl AppError {
    /// Underlying backend error, if any.
    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            Self::IndexLoad(err) | Self::Publish(err) => Some(err),
            Self::CollectionLoad { source, .. } => Some(source),
            Self::Prepare(_) => None,
        }
    }

    /// Short title for the error view.
    pub fn title(&self) -> String {
        match self.source_error() {
            Some(err) => err.kind().to_string(),
            None => "Publish Aborted".to_string(),
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Prepare(_) => Some("Fix the record that failed to serialize and publish again."),
            _ => self.source_error().and_then(SourceError::suggestion),
        }
    }
}

/// Failure while preparing a publish request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublishError {
    /// No file has unsaved changes.
    #[error("no changes to publish")]
    NothingToPublish,

    /// The backend is read-only.
    #[error("this source does not accept changes")]
    ReadOnly,

    /// A working copy could not be serialized.
    #[error("failed to serialize {path}: {reason}")]
    Serialize { path: String, reason: String },
}
