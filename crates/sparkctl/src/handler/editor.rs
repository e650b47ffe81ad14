//! Field editor handlers.
//!
//! Handles:
//! - Device type field list (inline edit, cycle, open YAML editor or registers)
//! - Register field list (inline edit, cycle)
//! - YAML section editor (Ctrl+S apply, Esc cancel)
//!
//! An inline edit buffer captures every key until it is confirmed with Enter
//! or dropped with Esc.

use spark_model::Section;

use super::MessageHandler;
use crate::editing::{
    Editable, EditableField, FieldKind, FieldTarget, apply_section, section_text,
};
use crate::error::EditError;
use crate::message::Key;
use crate::state::{AppState, EditBuffer, TextBuffer, View, step_down, step_up};
use crate::task::Task;

/// Handler for keys in the editor views.
pub struct EditorHandler;

impl MessageHandler<Key> for EditorHandler {
    fn handle(&self, state: &mut AppState, key: Key) -> Task {
        match state.view {
            View::ConfigBlobEdit(section) => handle_blob(state, section, key),
            View::RecordEdit | View::SubEntryEdit => {
                if state.edit.as_ref().is_some_and(EditBuffer::is_field) {
                    handle_inline(state, key);
                } else {
                    handle_field_list(state, key);
                }
            }
            _ => {}
        }
        Task::none()
    }
}

// =============================================================================
// FIELD LISTS
// =============================================================================

/// Field under the cursor, with the target it edits.
fn selected_field(state: &AppState) -> Option<(FieldTarget, FieldKind, String)> {
    fn pick<K: Copy>(
        fields: Vec<EditableField<K>>,
        cursor: usize,
        wrap: fn(K) -> FieldTarget,
    ) -> Option<(FieldTarget, FieldKind, String)> {
        fields
            .into_iter()
            .nth(cursor)
            .map(|f| (wrap(f.key), f.kind, f.value))
    }

    match state.view {
        View::RecordEdit => pick(
            state.record_fields(),
            state.selection.field,
            FieldTarget::Record,
        ),
        View::SubEntryEdit => pick(
            state.register_fields(),
            state.selection.register_field,
            FieldTarget::Register,
        ),
        _ => None,
    }
}

fn handle_field_list(state: &mut AppState, key: Key) {
    let register = state.view == View::SubEntryEdit;
    let count = if register {
        state.register_fields().len()
    } else {
        state.record_fields().len()
    };
    let cursor = if register {
        &mut state.selection.register_field
    } else {
        &mut state.selection.field
    };

    match key {
        k if k.is_up() => step_up(cursor),
        k if k.is_down() => step_down(cursor, count),
        Key::Enter | Key::Char('e') => open_field(state),
        Key::Tab => cycle_field(state),
        k if k.is_back() => state.back(),
        _ => {}
    }
}

/// Start editing the field under the cursor.
fn open_field(state: &mut AppState) {
    let Some((target, kind, value)) = selected_field(state) else {
        return;
    };
    match kind {
        FieldKind::Text { .. } | FieldKind::Choice { .. } => {
            state.edit = Some(EditBuffer::Field {
                target,
                input: TextBuffer::single_line(&value),
            });
        }
        FieldKind::Blob(section) => open_blob(state, section),
        FieldKind::SubList => {
            state.selection.register = 0;
            state.navigate(View::SubListView);
        }
    }
}

fn open_blob(state: &mut AppState, section: Section) {
    let text = match state.current_device().map(|d| section_text(d, section)) {
        Some(Ok(text)) => text,
        Some(Err(err)) => return state.reject(&err),
        None => return,
    };
    state.navigate(View::ConfigBlobEdit(section));
    state.edit = Some(EditBuffer::Blob {
        section,
        input: TextBuffer::multi_line(&text),
    });
}

fn cycle_field(state: &mut AppState) {
    let Some((target, FieldKind::Choice { .. }, _)) = selected_field(state) else {
        return;
    };
    let result = match target {
        FieldTarget::Record(key) => state
            .modify_device(|device| device.cycle(key))
            .map(|value| (key.name(), value)),
        FieldTarget::Register(key) => state
            .modify_register(|register| register.cycle(key))
            .map(|value| (key.name(), value)),
    };
    match result {
        Ok((name, value)) => state.set_status(format!("{name}: {value}")),
        Err(err) => state.reject(&err),
    }
}

// =============================================================================
// INLINE BUFFER
// =============================================================================

fn handle_inline(state: &mut AppState, key: Key) {
    match key {
        Key::Enter => commit_inline(state),
        Key::Esc => state.edit = None,
        _ => {
            if let Some(edit) = state.edit.as_mut() {
                edit_text(edit.input_mut(), key);
            }
        }
    }
}

fn commit_inline(state: &mut AppState) {
    let Some(EditBuffer::Field { target, input }) = state.edit.take() else {
        return;
    };
    let text = input.text();
    let result: Result<&'static str, EditError> = match target {
        FieldTarget::Record(key) => state
            .modify_device(|device| device.apply(key, &text))
            .map(|()| key.name()),
        FieldTarget::Register(key) => state
            .modify_register(|register| register.apply(key, &text))
            .map(|()| key.name()),
    };
    match result {
        Ok(name) => state.set_status(format!("Updated {name}")),
        Err(err) => state.reject(&err),
    }
}

/// Apply a text-editing key to a buffer.
fn edit_text(input: &mut TextBuffer, key: Key) {
    match key {
        Key::Char(c) => input.insert_char(c),
        Key::Enter => input.insert_newline(),
        Key::Tab => {
            input.insert_char(' ');
            input.insert_char(' ');
        }
        Key::Backspace => input.backspace(),
        Key::Delete => input.delete(),
        Key::Left => input.move_left(),
        Key::Right => input.move_right(),
        Key::Up => input.move_up(),
        Key::Down => input.move_down(),
        Key::Home => input.move_home(),
        Key::End => input.move_end(),
        Key::Esc | Key::Ctrl(_) => {}
    }
}

// =============================================================================
// YAML EDITOR
// =============================================================================

fn handle_blob(state: &mut AppState, section: Section, key: Key) {
    match key {
        Key::Ctrl('s') => save_blob(state, section),
        Key::Esc => state.back(),
        _ => match state.edit.as_mut() {
            Some(edit) => edit_text(edit.input_mut(), key),
            None => state.back(),
        },
    }
}

/// Parse the buffer into the section and return to the field list.
///
/// A parse failure drops the buffer and leaves the section unchanged.
fn save_blob(state: &mut AppState, section: Section) {
    let text = match state.edit.take() {
        Some(EditBuffer::Blob { input, .. }) => input.text(),
        _ => return state.back(),
    };
    let result = state.modify_device(|device| apply_section(device, section, &text));
    state.back();
    match result {
        Ok(()) => state.set_status(format!("Saved {}", section.key())),
        Err(err) => state.reject(&err),
    }
}
