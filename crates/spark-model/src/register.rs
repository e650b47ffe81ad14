//! Modbus register definitions.
//!
//! Registers live as a YAML sequence under `technology_config` so any extra
//! keys a register carries are preserved. [`RegisterDefinition`] is a
//! read-only typed snapshot; [`RegisterMut`] edits one entry in place.

use serde_yaml::{Mapping, Value};

use crate::options::DataType;

/// Key of the register list inside `technology_config`.
pub const REGISTERS_KEY: &str = "register_definitions";

const FIELD_KEY: &str = "field";
const NAME_KEY: &str = "name";
const UNIT_KEY: &str = "unit";
const ADDRESS_KEY: &str = "address";
const DATA_TYPE_KEY: &str = "data_type";
const SCALE_KEY: &str = "scale";
const OFFSET_KEY: &str = "offset";

/// Typed view of one register entry.
///
/// Missing or mistyped keys read as their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterDefinition {
    pub field_name: String,
    pub field_unit: String,
    pub address: u64,
    pub data_type: String,
    pub scale: f64,
    pub offset: f64,
}

impl RegisterDefinition {
    /// Read a register from an arbitrary YAML value.
    pub fn from_value(value: &Value) -> Self {
        value
            .as_mapping()
            .map(Self::from_mapping)
            .unwrap_or_else(|| Self::from_mapping(&Mapping::new()))
    }

    /// Read a register from its mapping.
    pub fn from_mapping(map: &Mapping) -> Self {
        let field = map.get(FIELD_KEY).and_then(Value::as_mapping);
        let field_str = |key: &str| {
            field
                .and_then(|f| f.get(key))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        };
        Self {
            field_name: field_str(NAME_KEY),
            field_unit: field_str(UNIT_KEY),
            address: map.get(ADDRESS_KEY).and_then(Value::as_u64).unwrap_or(0),
            data_type: map
                .get(DATA_TYPE_KEY)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            scale: map.get(SCALE_KEY).and_then(Value::as_f64).unwrap_or(1.0),
            offset: map.get(OFFSET_KEY).and_then(Value::as_f64).unwrap_or(0.0),
        }
    }

    /// Mapping for a freshly added register.
    pub fn default_mapping() -> Mapping {
        let mut field = Mapping::new();
        field.insert(NAME_KEY.into(), "new_field".into());
        field.insert(UNIT_KEY.into(), "".into());

        let mut map = Mapping::new();
        map.insert(FIELD_KEY.into(), Value::Mapping(field));
        map.insert(ADDRESS_KEY.into(), 0u64.into());
        map.insert(DATA_TYPE_KEY.into(), DataType::default().as_str().into());
        map.insert(SCALE_KEY.into(), 1.0f64.into());
        map.insert(OFFSET_KEY.into(), 0.0f64.into());
        map
    }

    /// One-line summary for list rows.
    pub fn summary(&self) -> String {
        let unit = if self.field_unit.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.field_unit)
        };
        format!(
            "{:>5}  {}{}  ({})",
            self.address, self.field_name, unit, self.data_type
        )
    }
}

/// Mutable handle on one register entry.
///
/// An entry that is not a mapping reads as the defaults and is only replaced
/// by a mapping once a setter runs.
#[derive(Debug)]
pub struct RegisterMut<'a> {
    entry: &'a mut Value,
}

impl<'a> RegisterMut<'a> {
    pub(crate) fn new(entry: &'a mut Value) -> Self {
        Self { entry }
    }

    fn map_mut(&mut self) -> Option<&mut Mapping> {
        if !self.entry.is_mapping() {
            *self.entry = Value::Mapping(Mapping::new());
        }
        self.entry.as_mapping_mut()
    }

    fn insert(&mut self, key: &str, value: Value) {
        if let Some(map) = self.map_mut() {
            map.insert(key.into(), value);
        }
    }

    fn set_field_key(&mut self, key: &str, value: &str) {
        let Some(map) = self.map_mut() else {
            return;
        };
        let slot = map
            .entry(FIELD_KEY.into())
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !slot.is_mapping() {
            *slot = Value::Mapping(Mapping::new());
        }
        if let Some(field) = slot.as_mapping_mut() {
            field.insert(key.into(), value.into());
        }
    }

    pub fn set_field_name(&mut self, name: &str) {
        self.set_field_key(NAME_KEY, name);
    }

    pub fn set_field_unit(&mut self, unit: &str) {
        self.set_field_key(UNIT_KEY, unit);
    }

    pub fn set_address(&mut self, address: u16) {
        self.insert(ADDRESS_KEY, u64::from(address).into());
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.insert(DATA_TYPE_KEY, data_type.as_str().into());
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.insert(SCALE_KEY, scale.into());
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.insert(OFFSET_KEY, offset.into());
    }

    /// Typed snapshot of the current contents.
    pub fn snapshot(&self) -> RegisterDefinition {
        RegisterDefinition::from_value(self.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_values() {
        let reg = RegisterDefinition::from_mapping(&RegisterDefinition::default_mapping());
        assert_eq!(reg.field_name, "new_field");
        assert_eq!(reg.field_unit, "");
        assert_eq!(reg.address, 0);
        assert_eq!(reg.data_type, "uint16");
        assert_eq!(reg.scale, 1.0);
        assert_eq!(reg.offset, 0.0);
    }

    #[test]
    fn test_setters_preserve_unknown_keys() {
        let mut map = RegisterDefinition::default_mapping();
        map.insert("byte_order".into(), "big".into());
        let mut entry = Value::Mapping(map);

        let mut reg = RegisterMut::new(&mut entry);
        reg.set_field_name("voltage_l1");
        reg.set_field_unit("V");
        reg.set_address(4000);
        reg.set_data_type(DataType::Float32);
        reg.set_scale(0.1);

        let snap = reg.snapshot();
        assert_eq!(snap.field_name, "voltage_l1");
        assert_eq!(snap.field_unit, "V");
        assert_eq!(snap.address, 4000);
        assert_eq!(snap.data_type, "float32");
        assert_eq!(snap.scale, 0.1);
        assert_eq!(entry.get("byte_order").and_then(Value::as_str), Some("big"));
    }

    #[test]
    fn test_field_replaced_when_not_mapping() {
        let mut map = Mapping::new();
        map.insert(FIELD_KEY.into(), "broken".into());
        let mut entry = Value::Mapping(map);
        RegisterMut::new(&mut entry).set_field_name("power");
        assert_eq!(RegisterDefinition::from_value(&entry).field_name, "power");
    }

    #[test]
    fn test_non_mapping_entry_replaced_only_on_write() {
        let mut entry = Value::from(5);
        let mut reg = RegisterMut::new(&mut entry);
        assert_eq!(reg.snapshot().address, 0);

        reg.set_address(12);
        assert_eq!(reg.snapshot().address, 12);
        assert!(entry.is_mapping());
    }
}
