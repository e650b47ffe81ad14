//! Application state management.
//!
//! - **AppState**: Root state owned by the update loop
//! - **ChangeStore**: Original and working copies of loaded vendor files
//! - **View / Selection**: Current screen and list cursors
//! - **EditBuffer**: Text of an edit in progress

mod app_state;
mod edit_buffer;
mod navigation;
mod store;

pub use app_state::{AppState, Operation, Status};
pub use edit_buffer::{EditBuffer, TextBuffer};
pub use navigation::{Selection, View, clamp, step_down, step_up};
pub use store::{ChangeStore, FileState};
