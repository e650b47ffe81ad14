//! Error types for storage backends.

use std::fmt;

use spark_model::ModelError;
use thiserror::Error;

/// Coarse classification of a [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Auth,
    Conflict,
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "Not Found",
            Self::Parse => "Parse Error",
            Self::Auth => "Authentication Failed",
            Self::Conflict => "Conflict",
            Self::Transport => "Transport Error",
        };
        f.write_str(label)
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The requested file or branch does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Path (or branch name) that was requested.
        path: String,
    },

    /// The fetched document could not be decoded or parsed.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// Path of the document.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// Credentials were missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote copy changed since it was fetched.
    #[error("conflict updating {path}: {reason}")]
    Conflict {
        /// Path of the file whose token was stale.
        path: String,
        /// Server message.
        reason: String,
    },

    /// Network, filesystem or process failure.
    #[error("{context}: {reason}")]
    Transport {
        /// What was being attempted.
        context: String,
        /// Underlying error message.
        reason: String,
    },
}

impl SourceError {
    /// Build a parse error for `path` from a model error.
    pub fn parse(path: impl Into<String>, err: &ModelError) -> Self {
        Self::Parse {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Build a transport error.
    pub fn transport(context: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Transport {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Map a filesystem error on `path`, turning missing files into [`Self::NotFound`].
    pub fn io(operation: &str, path: impl Into<String>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Transport {
                context: format!("failed to {operation} {path}"),
                reason: err.to_string(),
            }
        }
    }

    /// Classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Returns a user-friendly message suitable for the error view.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("'{path}' does not exist in the library."),
            Self::Parse { path, .. } => format!("'{path}' is not a valid library document."),
            Self::Auth(_) => "GitHub rejected the credentials.".to_string(),
            Self::Conflict { path, .. } => {
                format!("'{path}' was changed upstream after it was loaded.")
            }
            Self::Transport { context, .. } => format!("Operation failed: {context}."),
        }
    }

    /// Returns a hint on how to recover.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Check the manifest entry and the library path."),
            Self::Parse { .. } => Some("Fix the YAML syntax in the file and reload."),
            Self::Auth(_) => Some("Run 'gh auth login' or set GH_TOKEN, or use --local."),
            Self::Conflict { .. } => {
                Some("Restart sparkctl to reload the file, then apply your edits again.")
            }
            Self::Transport { .. } => Some("Check your connection and try again."),
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport("request failed", err)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::transport("I/O error", err)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            path: "API response".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, SourceError>;
