//! List and detail view handlers.
//!
//! Handles:
//! - Vendor list: open vendor, publish, retry manifest, quit
//! - Device list: open device, add device, revert file
//! - Device detail: edit, delete
//! - Register list: open, add, delete

use spark_model::{DeviceType, RegisterDefinition};

use super::MessageHandler;
use crate::error::EditError;
use crate::message::Key;
use crate::state::{AppState, Operation, View, clamp, step_down, step_up};
use crate::task::Task;

/// Handler for keys in the browsing views.
pub struct BrowseHandler;

impl MessageHandler<Key> for BrowseHandler {
    fn handle(&self, state: &mut AppState, key: Key) -> Task {
        match state.view {
            View::GroupList => handle_group_list(state, key),
            View::RecordList => handle_record_list(state, key),
            View::RecordDetail => handle_record_detail(state, key),
            View::SubListView => handle_register_list(state, key),
            _ => Task::none(),
        }
    }
}

// =============================================================================
// VENDOR LIST
// =============================================================================

fn handle_group_list(state: &mut AppState, key: Key) -> Task {
    let count = state.vendor_count();
    match key {
        k if k.is_up() => step_up(&mut state.selection.group),
        k if k.is_down() => step_down(&mut state.selection.group, count),
        Key::Enter => return open_group(state),
        Key::Char('p' | 's') => {
            if !state.can_write() {
                state.set_error_status("This source is read-only");
            } else if state.store.has_changes() {
                state.navigate(View::ConfirmPublish);
            } else {
                state.set_status("No changes to publish");
            }
        }
        Key::Char('r') if state.manifest.is_none() => {
            if state.begin(Operation::FetchIndex) {
                return Task::FetchIndex;
            }
        }
        Key::Char('q') | Key::Ctrl('c') => return Task::Quit,
        _ => {}
    }
    Task::none()
}

/// Enter the vendor under the cursor, fetching its file on first visit.
fn open_group(state: &mut AppState) -> Task {
    let Some(path) = state.current_vendor().map(|v| v.storage_path()) else {
        return Task::none();
    };

    if state.store.contains(&path) {
        state.current_path = Some(path);
        state.selection.record = 0;
        state.navigate(View::RecordList);
        return Task::none();
    }

    if state.begin(Operation::FetchCollection { path: path.clone() }) {
        state.current_path = Some(path.clone());
        Task::FetchCollection { path }
    } else {
        Task::none()
    }
}

// =============================================================================
// DEVICE LIST
// =============================================================================

fn handle_record_list(state: &mut AppState, key: Key) -> Task {
    let count = state.record_count();
    match key {
        k if k.is_up() => step_up(&mut state.selection.record),
        k if k.is_down() => step_down(&mut state.selection.record, count),
        Key::Enter if state.current_device().is_some() => state.navigate(View::RecordDetail),
        Key::Char('n') => add_device(state),
        Key::Char('u') => revert_group(state),
        k if k.is_back() => state.back(),
        _ => {}
    }
    Task::none()
}

fn add_device(state: &mut AppState) {
    let vendor = state
        .current_vendor()
        .map(|v| v.name.clone())
        .unwrap_or_default();
    match state.modify_file(|file| Ok(file.push(DeviceType::new_for_vendor(vendor)))) {
        Ok(index) => {
            state.selection.record = index;
            state.navigate(View::RecordEdit);
            state.set_status("Added device");
        }
        Err(err) => state.reject(&err),
    }
}

fn revert_group(state: &mut AppState) {
    let Some(path) = state.current_path.clone() else {
        return;
    };
    if !state.current_is_dirty() {
        state.set_status("No changes to revert");
        return;
    }
    if state.store.revert(&path) {
        let count = state.record_count();
        clamp(&mut state.selection.record, count);
        state.set_status(format!("Reverted {path}"));
    }
}

// =============================================================================
// DEVICE DETAIL
// =============================================================================

fn handle_record_detail(state: &mut AppState, key: Key) -> Task {
    match key {
        Key::Enter | Key::Char('e') => state.navigate(View::RecordEdit),
        Key::Char('d') => delete_device(state),
        k if k.is_back() => state.back(),
        _ => {}
    }
    Task::none()
}

fn delete_device(state: &mut AppState) {
    let index = state.selection.record;
    let removed = state.modify_file(|file| file.remove(index).ok_or(EditError::NoSelection));
    match removed {
        Ok(device) => {
            let count = state.record_count();
            clamp(&mut state.selection.record, count);
            state.navigate(View::RecordList);
            state.set_status(format!("Deleted {}", device.name));
        }
        Err(err) => state.reject(&err),
    }
}

// =============================================================================
// REGISTER LIST
// =============================================================================

fn handle_register_list(state: &mut AppState, key: Key) -> Task {
    let count = state.register_count();
    match key {
        k if k.is_up() => step_up(&mut state.selection.register),
        k if k.is_down() => step_down(&mut state.selection.register, count),
        Key::Enter if state.current_register().is_some() => state.navigate(View::SubEntryEdit),
        Key::Char('n') => add_register(state),
        Key::Char('d') => delete_register(state),
        k if k.is_back() => state.back(),
        _ => {}
    }
    Task::none()
}

fn add_register(state: &mut AppState) {
    let added = state.modify_device(|device| {
        if device.is_register_based() {
            Ok(device.push_register(RegisterDefinition::default_mapping()))
        } else {
            Err(EditError::NotEditable { field: "registers" })
        }
    });
    match added {
        Ok(index) => {
            state.selection.register = index;
            state.navigate(View::SubEntryEdit);
            state.set_status("Added register");
        }
        Err(err) => state.reject(&err),
    }
}

fn delete_register(state: &mut AppState) {
    if state.current_register().is_none() {
        return;
    }
    let index = state.selection.register;
    let removed = state.modify_device(|device| {
        device
            .remove_register(index)
            .map(drop)
            .ok_or(EditError::NoSelection)
    });
    match removed {
        Ok(()) => {
            let count = state.register_count();
            clamp(&mut state.selection.register, count);
            state.set_status("Deleted register");
        }
        Err(err) => state.reject(&err),
    }
}
