//! YAML parsing and serialization.

use serde_yaml::{Mapping, Value};

use crate::device::{DeviceFile, Section};
use crate::error::{ModelError, Result};
use crate::manifest::Manifest;

/// Parse the manifest document.
pub fn parse_manifest(text: &str) -> Result<Manifest> {
    serde_yaml::from_str(text).map_err(|e| ModelError::parse("manifest", e))
}

/// Parse a vendor device file.
pub fn parse_device_file(text: &str) -> Result<DeviceFile> {
    serde_yaml::from_str(text).map_err(|e| ModelError::parse("device file", e))
}

/// Serialize a vendor device file.
///
/// Parsing the output yields a value equal to `file`.
pub fn serialize_device_file(file: &DeviceFile) -> Result<String> {
    serde_yaml::to_string(file).map_err(|e| ModelError::serialize("device file", e))
}

/// Render a section as editable YAML text.
///
/// An absent section renders as `null`.
pub fn section_to_yaml(section: Option<&Mapping>) -> Result<String> {
    match section {
        Some(map) => {
            serde_yaml::to_string(map).map_err(|e| ModelError::serialize("section", e))
        }
        None => Ok("null\n".to_string()),
    }
}

/// Parse edited section text.
///
/// Blank text or an explicit `null` yields `None`. Any other non-mapping
/// value is rejected.
pub fn parse_section(section: Section, text: &str) -> Result<Option<Mapping>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_yaml::from_str(text).map_err(|e| ModelError::parse("section", e))?;
    match value {
        Value::Null => Ok(None),
        Value::Mapping(map) => Ok(Some(map)),
        other => Err(ModelError::NotAMapping {
            section: section.key().to_string(),
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
