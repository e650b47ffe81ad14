//! Rendering.
//!
//! Every frame is drawn from [`AppState`] alone:
//!
//! - `header`: breadcrumb and mode badge
//! - `lists`: vendor, device and register lists
//! - `detail`: read-only device summary
//! - `editor`: field lists, inline buffer and YAML editor
//! - `dialog`: loading, publish confirmation and error views
//! - `footer`: status line, change count and key hints

mod detail;
mod dialog;
mod editor;
mod footer;
mod header;
mod lists;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, List, ListItem, ListState};

use crate::state::{AppState, View};
use crate::theme;

pub use footer::key_hints;

/// Draw the whole screen.
pub fn render(frame: &mut Frame, state: &AppState) {
    let [header_area, body, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    header::render(frame, header_area, state);
    match state.view {
        View::Loading => dialog::render_loading(frame, body, state),
        View::GroupList => lists::render_groups(frame, body, state),
        View::RecordList => lists::render_records(frame, body, state),
        View::RecordDetail => detail::render(frame, body, state),
        View::RecordEdit => editor::render_record_fields(frame, body, state),
        View::ConfigBlobEdit(section) => editor::render_blob(frame, body, state, section),
        View::SubListView => lists::render_registers(frame, body, state),
        View::SubEntryEdit => editor::render_register_fields(frame, body, state),
        View::ConfirmPublish => dialog::render_confirm(frame, body, state),
        View::Error => dialog::render_error(frame, body, state),
    }
    footer::render(frame, footer_area, state);
}

/// Bordered, selectable list.
fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: String,
    items: Vec<ListItem<'_>>,
    cursor: usize,
) {
    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::bordered().title(title).title_style(theme::title()))
        .highlight_style(theme::selected())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected((!empty).then_some(cursor));
    frame.render_stateful_widget(list, area, &mut state);
}
