use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph};
use spark_model::DataType;

use super::render_list;
use crate::state::AppState;
use crate::theme;

pub fn render_groups(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(manifest) = &state.manifest else {
        let text = Paragraph::new("Manifest not loaded. Press r to retry.").style(theme::muted());
        frame.render_widget(text, area);
        return;
    };

    let items: Vec<ListItem> = manifest
        .vendors
        .iter()
        .map(|vendor| {
            let path = vendor.storage_path();
            let mut spans = vec![Span::raw(vendor.name.clone())];
            if !vendor.technologies.is_empty() {
                spans.push(Span::styled(
                    format!("  [{}]", vendor.technology_tags()),
                    theme::muted(),
                ));
            }
            if state.store.get(&path).is_some_and(|f| f.is_dirty()) {
                spans.push(Span::styled("  *", theme::dirty()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(
        "Vendors ({}) - library {} schema {}",
        manifest.vendor_count(),
        manifest.version,
        manifest.schema_version
    );
    render_list(frame, area, title, items, state.selection.group);
}

pub fn render_records(frame: &mut Frame, area: Rect, state: &AppState) {
    let devices = state
        .current_file()
        .map(|f| f.device_types.as_slice())
        .unwrap_or_default();
    let items: Vec<ListItem> = devices
        .iter()
        .map(|device| {
            ListItem::new(Line::from(vec![
                Span::raw(device.name.clone()),
                Span::styled(
                    format!("  {} · {}", device.model_number, device.technology()),
                    theme::muted(),
                ),
            ]))
        })
        .collect();

    let vendor = state
        .current_vendor()
        .map(|v| v.name.as_str())
        .unwrap_or("Devices");
    let marker = if state.current_is_dirty() { " *" } else { "" };
    let title = format!("{vendor} ({}){marker}", devices.len());
    render_list(frame, area, title, items, state.selection.record);
}

pub fn render_registers(frame: &mut Frame, area: Rect, state: &AppState) {
    let registers = state
        .current_device()
        .map(|d| d.registers())
        .unwrap_or_default();
    let items: Vec<ListItem> = registers
        .iter()
        .map(|reg| {
            let mut spans = vec![Span::raw(reg.summary())];
            let width = reg
                .data_type
                .parse::<DataType>()
                .map_or(1, |t| t.register_width());
            if width > 1 {
                let last = reg.address + u64::from(width) - 1;
                spans.push(Span::styled(
                    format!("  {}-{last}", reg.address),
                    theme::muted(),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let title = format!("Registers ({})", registers.len());
    render_list(frame, area, title, items, state.selection.register);
}
