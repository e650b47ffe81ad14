//! Message handlers.
//!
//! Handling is split by concern so each part of the state machine can be
//! tested on its own:
//!
//! - [`BrowseHandler`]: keys in the list and detail views
//! - [`EditorHandler`]: keys in the field editors and the YAML editor
//! - [`DialogHandler`]: keys in the publish confirmation and error views
//! - [`LoadHandler`]: manifest and vendor file fetch completions
//! - [`PublishHandler`]: publish completions
//!
//! # Architecture
//!
//! Each handler implements [`MessageHandler`] for the message type it
//! processes. [`crate::app::App::update`] dispatches to them:
//!
//! ```ignore
//! match message {
//!     Message::Key(key) => match state.view {
//!         View::GroupList | View::RecordList => BrowseHandler.handle(state, key),
//!         // ...
//!     },
//!     Message::IndexLoaded(result) => LoadHandler.handle(state, result),
//!     // ...
//! }
//! ```

mod browse;
mod dialog;
mod editor;
mod load;
mod publish;

use crate::state::AppState;
use crate::task::Task;

pub use browse::BrowseHandler;
pub use dialog::DialogHandler;
pub use editor::EditorHandler;
pub use load::{CollectionResult, LoadHandler};
pub use publish::{PublishHandler, start_publish};

/// Trait for handling one kind of message.
///
/// # Type Parameters
///
/// * `M` - The message type this handler processes
pub trait MessageHandler<M> {
    /// Handle a message, mutating state and returning follow-up work.
    ///
    /// Returns [`Task::None`] when nothing needs to run off the event path.
    fn handle(&self, state: &mut AppState, msg: M) -> Task;
}
