//! Follow-up work returned from the update step.
//!
//! The state machine never performs I/O itself. Handlers return a [`Task`]
//! and the runtime executes it off the event path, posting the completion
//! back as a [`crate::message::Message`].

use spark_source::PublishRequest;

#[derive(Debug, Clone, Default)]
pub enum Task {
    /// Nothing to do.
    #[default]
    None,
    /// Fetch the manifest.
    FetchIndex,
    /// Fetch one vendor file.
    FetchCollection { path: String },
    /// Publish the prepared batch.
    Publish(PublishRequest),
    /// Leave the event loop.
    Quit,
}

impl Task {
    pub fn none() -> Self {
        Self::None
    }

    /// Whether the task suspends on the backend.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::FetchIndex | Self::FetchCollection { .. } | Self::Publish(_)
        )
    }
}
