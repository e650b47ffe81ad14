//! Main application struct and update dispatch.
//!
//! `App` owns the [`AppState`] and turns each [`Message`] into state changes
//! plus an optional [`Task`]. It performs no I/O, so the whole state machine
//! can be driven from tests by feeding messages.

use spark_source::SourceKind;

use crate::handler::{
    BrowseHandler, CollectionResult, DialogHandler, EditorHandler, LoadHandler, MessageHandler,
    PublishHandler,
};
use crate::message::{Key, Message};
use crate::state::{AppState, Operation, View};
use crate::task::Task;

/// Frames of the loading indicator.
pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(source_kind: SourceKind, can_write: bool) -> Self {
        Self {
            state: AppState::new(source_kind, can_write),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// First task: fetch the manifest.
    pub fn boot(&mut self) -> Task {
        if self.state.begin(Operation::FetchIndex) {
            Task::FetchIndex
        } else {
            Task::none()
        }
    }

    /// Process one message.
    pub fn update(&mut self, message: Message) -> Task {
        match message {
            Message::Key(key) => self.handle_key(key),
            Message::IndexLoaded(result) => LoadHandler.handle(&mut self.state, result),
            Message::CollectionLoaded { path, result } => {
                LoadHandler.handle(&mut self.state, CollectionResult { path, result })
            }
            Message::Published(result) => PublishHandler.handle(&mut self.state, result),
            Message::Tick => {
                if self.state.view == View::Loading {
                    self.state.spinner = (self.state.spinner + 1) % SPINNER.len();
                }
                Task::none()
            }
        }
    }

    fn handle_key(&mut self, key: Key) -> Task {
        let state = &mut self.state;
        match state.view {
            View::Loading => Task::none(),
            View::GroupList | View::RecordList | View::RecordDetail | View::SubListView => {
                BrowseHandler.handle(state, key)
            }
            View::RecordEdit | View::SubEntryEdit | View::ConfigBlobEdit(_) => {
                EditorHandler.handle(state, key)
            }
            View::ConfirmPublish | View::Error => DialogHandler.handle(state, key),
        }
    }
}
