use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::state::{AppState, View};
use crate::theme;

/// Key hints for the current view as (keys, action) pairs.
pub fn key_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    let editing_field = state.edit.as_ref().is_some_and(|e| e.is_field());
    match state.view {
        View::Loading => vec![],
        View::GroupList => {
            let mut hints = vec![("↑↓", "move"), ("Enter", "open")];
            if state.manifest.is_none() {
                hints.push(("r", "retry"));
            }
            if state.store.has_changes() {
                hints.push(("p", "publish"));
            }
            hints.push(("q", "quit"));
            hints
        }
        View::RecordList => vec![
            ("↑↓", "move"),
            ("Enter", "view"),
            ("n", "new"),
            ("u", "revert"),
            ("Esc", "back"),
        ],
        View::RecordDetail => vec![("e", "edit"), ("d", "delete"), ("Esc", "back")],
        View::RecordEdit | View::SubEntryEdit if editing_field => {
            vec![("Enter", "apply"), ("Esc", "cancel")]
        }
        View::RecordEdit | View::SubEntryEdit => vec![
            ("↑↓", "move"),
            ("Enter", "edit"),
            ("Tab", "cycle"),
            ("Esc", "back"),
        ],
        View::ConfigBlobEdit(_) => vec![("Ctrl+S", "save"), ("Esc", "cancel")],
        View::SubListView => vec![
            ("↑↓", "move"),
            ("Enter", "edit"),
            ("n", "new"),
            ("d", "delete"),
            ("Esc", "back"),
        ],
        View::ConfirmPublish => vec![("y", "publish"), ("n", "cancel")],
        View::Error => vec![("Enter", "back to vendors")],
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let status = match &state.status {
        Some(status) => Line::styled(status.text.clone(), theme::status(status.is_error)),
        None => Line::raw(""),
    };

    let mut spans = Vec::new();
    let changed = state.store.dirty_count();
    if changed > 0 {
        spans.push(Span::styled(format!("{changed} changed  "), theme::dirty()));
    }
    for (keys, action) in key_hints(state) {
        spans.push(Span::styled(keys, theme::key_label()));
        spans.push(Span::styled(format!(" {action}  "), theme::muted()));
    }

    frame.render_widget(Paragraph::new(vec![status, Line::from(spans)]), area);
}
