//! Publish start and completion.

use spark_source::{Published, SourceError};

use super::MessageHandler;
use crate::error::{AppError, PublishError};
use crate::publish::prepare;
use crate::state::{AppState, Operation, View};
use crate::task::Task;

/// Serialize the dirty files and hand them to the backend.
///
/// Nothing is sent when any file fails to serialize.
pub fn start_publish(state: &mut AppState) -> Task {
    if state.is_busy() {
        state.set_error_status("Another operation is still running");
        return Task::none();
    }
    match prepare(&state.store, state.can_write()) {
        Ok(request) => {
            let paths: Vec<String> = request.changes.keys().cloned().collect();
            if state.begin(Operation::Publish { paths }) {
                Task::Publish(request)
            } else {
                Task::none()
            }
        }
        Err(err @ (PublishError::NothingToPublish | PublishError::ReadOnly)) => {
            state.navigate(View::GroupList);
            state.set_error_status(err.to_string());
            Task::none()
        }
        Err(err) => {
            state.fail(AppError::Prepare(err));
            Task::none()
        }
    }
}

/// Handler for publish completions.
pub struct PublishHandler;

impl MessageHandler<Result<Published, SourceError>> for PublishHandler {
    fn handle(&self, state: &mut AppState, result: Result<Published, SourceError>) -> Task {
        let paths = match state.finish() {
            Some(Operation::Publish { paths }) => paths,
            other => {
                tracing::debug!("Publish completed while tracking {:?}", other);
                Vec::new()
            }
        };
        match result {
            Ok(published) => {
                tracing::info!("Published {} file(s): {}", paths.len(), published);
                state.store.clear_dirty(paths.iter().map(String::as_str));
                state.navigate(View::GroupList);
                state.set_status(published.to_string());
            }
            Err(err) => state.fail(AppError::Publish(err)),
        }
        Task::none()
    }
}
