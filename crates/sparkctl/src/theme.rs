//! Terminal color palette.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Cyan;
pub const MUTED: Color = Color::DarkGray;
pub const SUCCESS: Color = Color::Green;
pub const WARNING: Color = Color::Yellow;
pub const ERROR: Color = Color::Red;

pub fn title() -> Style {
    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::new().fg(MUTED)
}

/// Highlighted list row.
pub fn selected() -> Style {
    Style::new()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn key_label() -> Style {
    Style::new().fg(ACCENT)
}

pub fn field_label() -> Style {
    Style::new().fg(WARNING)
}

pub fn dirty() -> Style {
    Style::new().fg(WARNING).add_modifier(Modifier::BOLD)
}

pub fn status(is_error: bool) -> Style {
    if is_error {
        Style::new().fg(ERROR)
    } else {
        Style::new().fg(SUCCESS)
    }
}

/// Mode badge in the header.
pub fn badge(is_local: bool) -> Style {
    let bg = if is_local { WARNING } else { SUCCESS };
    Style::new()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

pub fn error_title() -> Style {
    Style::new().fg(ERROR).add_modifier(Modifier::BOLD)
}
