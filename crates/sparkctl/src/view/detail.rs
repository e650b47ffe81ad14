use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use spark_model::{DeviceType, Section, Technology};

use crate::state::AppState;
use crate::theme;

fn row(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<22}"), theme::field_label()),
        Span::raw(value.into()),
    ])
}

fn summary(device: &DeviceType) -> Vec<Line<'static>> {
    let mut lines = vec![
        row("Vendor", device.vendor_name.clone()),
        row("Model", device.model_number.clone()),
        row("Name", device.name.clone()),
        row("Category", device.device_type.clone()),
        row("Technology", device.technology()),
    ];
    if let Some(text) = &device.description {
        lines.push(row("Description", text.clone()));
    }

    match device.technology_kind() {
        Some(Technology::Modbus) => {
            lines.push(row("Registers", device.register_count().to_string()));
        }
        Some(Technology::Lorawan) => lines.push(row("Device class", device.device_class())),
        Some(Technology::Wmbus) => {
            lines.push(row("Manufacturer code", device.manufacturer_code()));
            lines.push(row("wM-Bus device type", device.wmbus_device_type().to_string()));
            lines.push(row(
                "Encryption required",
                device.encryption_required().to_string(),
            ));
            lines.push(row(
                "Data record mappings",
                device.data_record_mapping_count().to_string(),
            ));
        }
        None => {}
    }

    lines.push(row("Controllable", device.is_controllable().to_string()));
    if !device.decoder_type().is_empty() {
        lines.push(row("Decoder", device.decoder_type()));
    }
    for section in [Section::Control, Section::Processor] {
        if device.section(section).is_none() {
            lines.push(row(section.label(), "(none)"));
        }
    }
    lines
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(device) = state.current_device() else {
        frame.render_widget(Paragraph::new("No device selected").style(theme::muted()), area);
        return;
    };
    let block = Block::bordered()
        .title(device.name.clone())
        .title_style(theme::title());
    frame.render_widget(
        Paragraph::new(summary(device))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
