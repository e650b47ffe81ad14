//! Publish confirmation and error view handlers.

use super::{MessageHandler, start_publish};
use crate::message::Key;
use crate::state::{AppState, View};
use crate::task::Task;

/// Handler for keys in the dialog views.
pub struct DialogHandler;

impl MessageHandler<Key> for DialogHandler {
    fn handle(&self, state: &mut AppState, key: Key) -> Task {
        match state.view {
            View::ConfirmPublish => match key {
                Key::Enter | Key::Char('y') => start_publish(state),
                Key::Char('n') | Key::Esc | Key::Backspace => {
                    state.navigate(View::GroupList);
                    Task::none()
                }
                _ => Task::none(),
            },
            View::Error => {
                if matches!(key, Key::Enter | Key::Esc | Key::Backspace) {
                    state.error = None;
                    state.navigate(View::GroupList);
                }
                Task::none()
            }
            _ => Task::none(),
        }
    }
}
