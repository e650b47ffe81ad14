use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use spark_source::SourceKind;

use crate::state::AppState;
use crate::theme;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let kind = state.source_kind();
    let badge = format!(" {} ", kind.badge());
    let badge_width = u16::try_from(badge.len()).unwrap_or(u16::MAX);
    let [crumbs_area, badge_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(badge_width)]).areas(area);

    let mut spans = vec![Span::styled("sparkctl ", theme::title())];
    for (i, crumb) in state.breadcrumb().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", theme::muted()));
        }
        spans.push(Span::raw(crumb));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), crumbs_area);
    frame.render_widget(
        Paragraph::new(Span::styled(badge, theme::badge(kind == SourceKind::Local))),
        badge_area,
    );
}
