use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::app::SPINNER;
use crate::state::AppState;
use crate::theme;

pub fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let label = state
        .in_flight()
        .map(|op| op.label())
        .unwrap_or_else(|| "Loading".to_string());
    let frame_char = SPINNER[state.spinner % SPINNER.len()];
    let text = Line::from(vec![
        Span::styled(format!("{frame_char} "), theme::title()),
        Span::raw(format!("{label}...")),
    ]);
    frame.render_widget(Paragraph::new(text).block(Block::bordered()), area);
}

pub fn render_confirm(frame: &mut Frame, area: Rect, state: &AppState) {
    let dirty = state.store.dirty_files();
    let target = if state.source_kind() == spark_source::SourceKind::Local {
        "Write these files to the local library?"
    } else {
        "Open a pull request with these files?"
    };

    let mut lines = vec![
        Line::styled(format!("{} file(s) changed:", dirty.len()), theme::title()),
        Line::raw(""),
    ];
    for file in &dirty {
        lines.push(Line::from(vec![
            Span::styled("  • ", theme::dirty()),
            Span::raw(file.path().to_string()),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(target));
    lines.push(Line::from(vec![
        Span::styled("y/Enter", theme::key_label()),
        Span::raw(" publish   "),
        Span::styled("n/Esc", theme::key_label()),
        Span::raw(" cancel"),
    ]));

    let block = Block::bordered()
        .title("Publish")
        .title_style(theme::title());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_error(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(err) = &state.error else {
        frame.render_widget(Paragraph::new("No error").style(theme::muted()), area);
        return;
    };

    let mut lines = Vec::new();
    if let Some(source) = err.source_error() {
        lines.push(Line::raw(source.user_message()));
    }
    lines.push(Line::raw(err.to_string()));
    lines.push(Line::raw(""));
    if err.source_error().is_some_and(|e| e.is_retryable()) {
        lines.push(Line::styled("The operation can be retried.", theme::muted()));
    }
    if let Some(hint) = err.suggestion() {
        lines.push(Line::styled(hint, theme::muted()));
        lines.push(Line::raw(""));
    }
    if state.store.has_changes() {
        lines.push(Line::styled(
            format!("{} unpublished file(s) are kept.", state.store.dirty_count()),
            theme::dirty(),
        ));
    }
    lines.push(Line::styled("Press Enter or Esc to return", theme::muted()));

    let block = Block::bordered()
        .title(err.title())
        .title_style(theme::error_title());
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
