use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, ListItem, Paragraph};
use spark_model::Section;

use super::render_list;
use crate::editing::{EditableField, FieldKind};
use crate::state::{AppState, EditBuffer, TextBuffer};
use crate::theme;

const LABEL_WIDTH: usize = 24;

fn field_item<K>(field: &EditableField<K>, editing: Option<&TextBuffer>) -> ListItem<'static> {
    let label = Span::styled(format!("{:<LABEL_WIDTH$}", field.label), theme::field_label());
    let value = match editing {
        Some(input) => Span::styled(format!("{}▏", input.text()), theme::title()),
        None => match field.kind {
            FieldKind::Blob(_) | FieldKind::SubList => {
                Span::styled(field.value.clone(), theme::key_label())
            }
            FieldKind::Choice { .. } if field.value.is_empty() => {
                Span::styled("(unset)", theme::muted())
            }
            _ => Span::raw(field.value.clone()),
        },
    };
    ListItem::new(Line::from(vec![label, value]))
}

fn render_fields<K>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: String,
    fields: &[EditableField<K>],
    cursor: usize,
) {
    let editing = state.edit.as_ref().filter(|e| e.is_field()).map(EditBuffer::input);
    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_item(field, editing.filter(|_| i == cursor)))
        .collect();
    render_list(frame, area, title, items, cursor);

    let hint = fields.get(cursor).and_then(EditableField::options);
    if let (Some(options), Some(_)) = (hint, editing) {
        let text = format!(" options: {} ", options.join(" | "));
        let y = area.bottom().saturating_sub(1);
        let hint_area = Rect::new(area.x + 1, y, area.width.saturating_sub(2), 1);
        frame.render_widget(Paragraph::new(text).style(theme::muted()), hint_area);
    }
}

pub fn render_record_fields(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = state
        .current_device()
        .map(|d| format!("Edit {}", d.name))
        .unwrap_or_else(|| "Edit".to_string());
    let fields = state.record_fields();
    render_fields(frame, area, state, title, &fields, state.selection.field);
}

pub fn render_register_fields(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = state
        .current_register()
        .map(|r| format!("Register {}", r.field_name))
        .unwrap_or_else(|| "Register".to_string());
    let fields = state.register_fields();
    render_fields(
        frame,
        area,
        state,
        title,
        &fields,
        state.selection.register_field,
    );
}

pub fn render_blob(frame: &mut Frame, area: Rect, state: &AppState, section: Section) {
    let block = Block::bordered()
        .title(format!("{} (Ctrl+S save, Esc cancel)", section.key()))
        .title_style(theme::title());
    let inner = block.inner(area);

    let Some(input) = state.edit.as_ref().map(EditBuffer::input) else {
        frame.render_widget(block, area);
        return;
    };

    let (row, col) = input.cursor();
    let height = usize::from(inner.height.max(1));
    let scroll = row.saturating_sub(height - 1);
    let lines: Vec<Line> = input
        .lines()
        .iter()
        .skip(scroll)
        .take(height)
        .map(|l| Line::raw(l.clone()))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let x = inner.x + u16::try_from(col).unwrap_or(u16::MAX).min(inner.width.saturating_sub(1));
    let y = inner.y + u16::try_from(row - scroll).unwrap_or(0);
    frame.set_cursor_position(Position::new(x, y));
}
