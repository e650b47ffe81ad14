//! Field editing.
//!
//! Device types and registers expose their editable attributes as an ordered
//! list of [`EditableField`] descriptors. Each descriptor carries a stable
//! key, the rendered current value and its [`FieldKind`]:
//!
//! - `Text`: assigned from an edit buffer after trimming
//! - `Choice`: cycled through a fixed option list or set from a buffer
//! - `Blob`: opens the YAML editor for a section
//! - `SubList`: opens the register list
//!
//! Applying validates the whole input before touching the target, so a
//! rejected value never leaves a partial write behind.

mod record;
mod register;
mod section;

pub use record::FieldKey;
pub use register::{RegisterFieldKey, register_fields};
pub use section::{apply_section, section_text};

use spark_model::Section;

use crate::error::EditError;

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text. `optional` fields treat an empty value as unset.
    Text { optional: bool },
    /// One of a fixed option list. `optional` fields also accept empty.
    Choice {
        options: &'static [&'static str],
        optional: bool,
    },
    /// A nested section edited as YAML.
    Blob(Section),
    /// Entry point into the register list.
    SubList,
}

/// One editable attribute with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableField<K> {
    pub key: K,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl<K> EditableField<K> {
    /// Option list for choice fields.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            FieldKind::Choice { options, .. } => Some(options),
            _ => None,
        }
    }
}

/// Which field an inline edit buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Record(FieldKey),
    Register(RegisterFieldKey),
}

/// Something with a list of editable fields.
pub trait Editable {
    /// Stable field identifier.
    type Key: Copy + PartialEq + std::fmt::Debug;

    /// Editable fields in display order.
    fn fields(&self) -> Vec<EditableField<Self::Key>>;

    /// Assign `input` to the field. Rejects invalid input without mutating.
    fn apply(&mut self, key: Self::Key, input: &str) -> Result<(), EditError>;

    /// Advance a choice field to its next option and return it.
    fn cycle(&mut self, key: Self::Key) -> Result<&'static str, EditError> {
        let field = self
            .fields()
            .into_iter()
            .find(|f| f.key == key)
            .ok_or(EditError::NoSelection)?;
        let options = field.options().ok_or(EditError::NotEditable { field: field.label })?;
        let next = cycle_option(options, &field.value);
        self.apply(key, next)?;
        Ok(next)
    }
}

/// Next option after `current`, wrapping around.
///
/// A value outside the list (including empty) moves to the first option.
pub fn cycle_option(options: &'static [&'static str], current: &str) -> &'static str {
    match options.iter().position(|o| *o == current) {
        Some(i) => options[(i + 1) % options.len()],
        None => options.first().copied().unwrap_or(""),
    }
}

/// Validate `input` against a choice field's options.
pub(crate) fn check_choice(
    field: &'static str,
    input: &str,
    options: &[&str],
    optional: bool,
) -> Result<(), EditError> {
    if options.contains(&input) || (optional && input.is_empty()) {
        Ok(())
    } else {
        Err(EditError::invalid_choice(field, input, options))
    }
}

/// Render a float the way it is typed back in.
pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_model::options::DATA_TYPES;

    #[test]
    fn test_cycle_option_wraps() {
        assert_eq!(cycle_option(DATA_TYPES, "uint16"), "int16");
        assert_eq!(cycle_option(DATA_TYPES, "float32"), "uint16");
        assert_eq!(cycle_option(DATA_TYPES, "bogus"), "uint16");
        assert_eq!(cycle_option(DATA_TYPES, ""), "uint16");
    }

    #[test]
    fn test_check_choice() {
        assert!(check_choice("data_type", "int32", DATA_TYPES, false).is_ok());
        assert!(check_choice("data_type", "", DATA_TYPES, false).is_err());
        assert!(check_choice("device_class", "", &["A", "B", "C"], true).is_ok());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(-2.5), "-2.5");
    }
}
