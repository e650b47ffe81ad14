//! Fetch completion handlers.

use spark_model::Manifest;
use spark_source::{FetchedCollection, SourceError};

use super::MessageHandler;
use crate::error::AppError;
use crate::state::{AppState, View, clamp};
use crate::task::Task;

/// Outcome of fetching one vendor file.
#[derive(Debug)]
pub struct CollectionResult {
    pub path: String,
    pub result: Result<FetchedCollection, SourceError>,
}

/// Handler for fetch completions.
pub struct LoadHandler;

impl MessageHandler<Result<Manifest, SourceError>> for LoadHandler {
    fn handle(&self, state: &mut AppState, result: Result<Manifest, SourceError>) -> Task {
        state.finish();
        match result {
            Ok(manifest) => {
                let count = manifest.vendor_count();
                tracing::info!(
                    "Loaded manifest {} (schema {}) with {} vendors",
                    manifest.version,
                    manifest.schema_version,
                    count
                );
                state.manifest = Some(manifest);
                clamp(&mut state.selection.group, count);
                state.navigate(View::GroupList);
                state.set_status(format!("Loaded {count} vendors"));
            }
            Err(err) => state.fail(AppError::IndexLoad(err)),
        }
        Task::none()
    }
}

impl MessageHandler<CollectionResult> for LoadHandler {
    fn handle(&self, state: &mut AppState, msg: CollectionResult) -> Task {
        state.finish();
        let CollectionResult { path, result } = msg;
        match result {
            Ok(fetched) => {
                let count = fetched.file.len();
                tracing::info!("Loaded {} with {} device types", path, count);
                state.store.load(path.clone(), fetched.file, fetched.token);
                state.current_path = Some(path);
                state.selection.record = 0;
                state.navigate(View::RecordList);
                state.set_status(format!("Loaded {count} devices"));
            }
            Err(source) => {
                if state.current_path.as_deref() == Some(path.as_str()) {
                    state.current_path = None;
                }
                state.fail(AppError::CollectionLoad { path, source });
            }
        }
        Task::none()
    }
}
