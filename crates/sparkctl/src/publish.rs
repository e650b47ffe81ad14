//! Building publish requests from the change store.

use spark_model::serialize_device_file;
use spark_source::{FileChange, PublishRequest};

use crate::error::PublishError;
use crate::state::ChangeStore;

/// Pull request title.
pub const PUBLISH_TITLE: &str = "Update device definitions via sparkctl";

/// Pull request body listing every changed path.
pub fn publish_body<'a>(paths: impl IntoIterator<Item = &'a str>) -> String {
    let mut body = String::from("This PR was created using sparkctl.\n\n## Changes\n");
    for path in paths {
        body.push_str(&format!("- Updated `{path}`\n"));
    }
    body
}

/// Serialize every dirty file into a publish request.
///
/// Fails before producing anything if a single file cannot be serialized.
pub fn prepare(store: &ChangeStore, can_write: bool) -> Result<PublishRequest, PublishError> {
    if !can_write {
        return Err(PublishError::ReadOnly);
    }
    let dirty = store.dirty_files();
    if dirty.is_empty() {
        return Err(PublishError::NothingToPublish);
    }

    let mut request = PublishRequest {
        title: PUBLISH_TITLE.to_string(),
        ..PublishRequest::default()
    };
    for state in dirty {
        let content =
            serialize_device_file(state.working()).map_err(|e| PublishError::Serialize {
                path: state.path().to_string(),
                reason: e.to_string(),
            })?;
        request.changes.insert(
            state.path().to_string(),
            FileChange {
                content,
                token: state.token().clone(),
            },
        );
    }
    request.body = publish_body(request.changes.keys().map(String::as_str));
    tracing::info!("Prepared {} file(s) for publishing", request.file_count());
    Ok(request)
}
