//! Editable fields of a Modbus register.

use spark_model::options::DATA_TYPES;
use spark_model::{DataType, RegisterDefinition, RegisterMut};

use super::{Editable, EditableField, FieldKind, check_choice, format_number};
use crate::error::EditError;

/// Identifies a register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterFieldKey {
    FieldName,
    FieldUnit,
    Address,
    DataType,
    Scale,
    Offset,
}

impl RegisterFieldKey {
    pub const ALL: [RegisterFieldKey; 6] = [
        Self::FieldName,
        Self::FieldUnit,
        Self::Address,
        Self::DataType,
        Self::Scale,
        Self::Offset,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::FieldName => "field_name",
            Self::FieldUnit => "field_unit",
            Self::Address => "address",
            Self::DataType => "data_type",
            Self::Scale => "scale",
            Self::Offset => "offset",
        }
    }

    const fn kind(&self) -> FieldKind {
        match self {
            Self::FieldName => FieldKind::Text { optional: false },
            Self::FieldUnit => FieldKind::Text { optional: true },
            Self::DataType => FieldKind::Choice {
                options: DATA_TYPES,
                optional: false,
            },
            Self::Address | Self::Scale | Self::Offset => FieldKind::Text { optional: false },
        }
    }
}

fn parse_address(value: &str) -> Result<u16, EditError> {
    let field = RegisterFieldKey::Address.name();
    let number: i64 = value
        .parse()
        .map_err(|e| EditError::invalid_number(field, value, e))?;
    u16::try_from(number).map_err(|_| EditError::OutOfRange {
        field,
        value: value.to_string(),
        min: 0,
        max: i64::from(u16::MAX),
    })
}

fn parse_finite(field: &'static str, value: &str) -> Result<f64, EditError> {
    let number: f64 = value
        .parse()
        .map_err(|e| EditError::invalid_number(field, value, e))?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(EditError::invalid_number(field, value, "must be finite"))
    }
}

/// Field list of a register snapshot.
pub fn register_fields(reg: &RegisterDefinition) -> Vec<EditableField<RegisterFieldKey>> {
    RegisterFieldKey::ALL
        .iter()
        .map(|key| {
            let value = match key {
                RegisterFieldKey::FieldName => reg.field_name.clone(),
                RegisterFieldKey::FieldUnit => reg.field_unit.clone(),
                RegisterFieldKey::Address => reg.address.to_string(),
                RegisterFieldKey::DataType => reg.data_type.clone(),
                RegisterFieldKey::Scale => format_number(reg.scale),
                RegisterFieldKey::Offset => format_number(reg.offset),
            };
            EditableField {
                key: *key,
                label: key.name(),
                kind: key.kind(),
                value,
            }
        })
        .collect()
}

impl Editable for RegisterMut<'_> {
    type Key = RegisterFieldKey;

    fn fields(&self) -> Vec<EditableField<RegisterFieldKey>> {
        register_fields(&self.snapshot())
    }

    fn apply(&mut self, key: RegisterFieldKey, input: &str) -> Result<(), EditError> {
        let value = input.trim();
        match key {
            RegisterFieldKey::FieldName => self.set_field_name(value),
            RegisterFieldKey::FieldUnit => self.set_field_unit(value),
            RegisterFieldKey::Address => self.set_address(parse_address(value)?),
            RegisterFieldKey::DataType => {
                check_choice(key.name(), value, DATA_TYPES, false)?;
                let data_type: DataType = value
                    .parse()
                    .map_err(|_| EditError::invalid_choice(key.name(), value, DATA_TYPES))?;
                self.set_data_type(data_type);
            }
            RegisterFieldKey::Scale => self.set_scale(parse_finite(key.name(), value)?),
            RegisterFieldKey::Offset => self.set_offset(parse_finite(key.name(), value)?),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_model::{DeviceType, Section, parse_section};

    fn device_with_register() -> DeviceType {
        let mut device = DeviceType::new_for_vendor("Acme");
        device.push_register(RegisterDefinition::default_mapping());
        device
    }

    #[test]
    fn test_field_values() {
        let mut device = device_with_register();
        let reg = device.register_mut(0).unwrap();
        let values: Vec<(&str, String)> = reg
            .fields()
            .into_iter()
            .map(|f| (f.label, f.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("field_name", "new_field".to_string()),
                ("field_unit", String::new()),
                ("address", "0".to_string()),
                ("data_type", "uint16".to_string()),
                ("scale", "1".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_address_bounds() {
        let mut device = device_with_register();
        let mut reg = device.register_mut(0).unwrap();
        reg.apply(RegisterFieldKey::Address, " 65535 ").unwrap();
        assert_eq!(reg.snapshot().address, 65535);

        assert!(matches!(
            reg.apply(RegisterFieldKey::Address, "-1"),
            Err(EditError::OutOfRange { .. })
        ));
        assert!(matches!(
            reg.apply(RegisterFieldKey::Address, "65536"),
            Err(EditError::OutOfRange { .. })
        ));
        assert!(matches!(
            reg.apply(RegisterFieldKey::Address, "abc"),
            Err(EditError::InvalidNumber { .. })
        ));
        assert_eq!(reg.snapshot().address, 65535);
    }

    #[test]
    fn test_scale_must_be_finite() {
        let mut device = device_with_register();
        let mut reg = device.register_mut(0).unwrap();
        reg.apply(RegisterFieldKey::Scale, "0.01").unwrap();
        assert!(reg.apply(RegisterFieldKey::Scale, "NaN").is_err());
        assert!(reg.apply(RegisterFieldKey::Offset, "inf").is_err());
        assert_eq!(reg.snapshot().scale, 0.01);
    }

    #[test]
    fn test_cycle_data_type() {
        let mut device = device_with_register();
        let mut reg = device.register_mut(0).unwrap();
        assert_eq!(reg.cycle(RegisterFieldKey::DataType).unwrap(), "int16");
        assert!(reg.apply(RegisterFieldKey::DataType, "float64").is_err());
        assert_eq!(reg.snapshot().data_type, "int16");
    }

    #[test]
    fn test_rejected_edit_keeps_malformed_entry() {
        let mut device = DeviceType::new_for_vendor("Acme");
        let section = parse_section(
            Section::Technology,
            "technology: modbus\nregister_definitions: [5]\n",
        )
        .unwrap();
        device.set_section(Section::Technology, section);
        let before = device.clone();

        let mut reg = device.register_mut(0).unwrap();
        assert!(reg.apply(RegisterFieldKey::Address, "70000").is_err());
        assert!(reg.apply(RegisterFieldKey::DataType, "float64").is_err());
        assert_eq!(device, before);

        let mut reg = device.register_mut(0).unwrap();
        reg.apply(RegisterFieldKey::Address, "12").unwrap();
        assert_eq!(device.registers()[0].address, 12);
    }
}
