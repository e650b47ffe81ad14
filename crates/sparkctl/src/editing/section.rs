//! YAML editing of device type sections.

use spark_model::options::TECHNOLOGIES;
use spark_model::{DeviceType, Section, parse_section, section_to_yaml};

use crate::error::EditError;

/// Current section contents as editable YAML.
pub fn section_text(device: &DeviceType, section: Section) -> Result<String, EditError> {
    section_to_yaml(device.section(section)).map_err(|e| EditError::section(section.key(), &e))
}

/// Replace a section with parsed `text`.
///
/// The device is left untouched when the text does not parse to a mapping
/// (or `null` for the optional sections). The technology section must keep a
/// known `technology` value.
pub fn apply_section(device: &mut DeviceType, section: Section, text: &str) -> Result<(), EditError> {
    let parsed = parse_section(section, text).map_err(|e| EditError::section(section.key(), &e))?;

    if section == Section::Technology {
        let valid = parsed
            .as_ref()
            .and_then(DeviceType::technology_in)
            .is_some();
        if !valid {
            return Err(EditError::MissingTechnology {
                expected: TECHNOLOGIES.join(", "),
            });
        }
    }

    device.set_section(section, parsed);
    Ok(())
}
