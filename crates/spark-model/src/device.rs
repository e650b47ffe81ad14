//! Device files and device types.
//!
//! A [`DeviceType`] has typed identity fields and three open-ended sections
//! stored as ordered YAML mappings. The accessor methods below give typed
//! access to the keys the editor knows about without fixing the full schema.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::options::{DEFAULT_CATEGORY, Technology};
use crate::register::{REGISTERS_KEY, RegisterDefinition, RegisterMut};

const TECHNOLOGY_KEY: &str = "technology";
const CONTROLLABLE_KEY: &str = "controllable";
const DECODER_TYPE_KEY: &str = "decoder_type";
const DEVICE_CLASS_KEY: &str = "device_class";
const MANUFACTURER_CODE_KEY: &str = "manufacturer_code";
const WMBUS_DEVICE_TYPE_KEY: &str = "wmbus_device_type";
const ENCRYPTION_REQUIRED_KEY: &str = "encryption_required";
const SHARED_KEY_KEY: &str = "shared_encryption_key";
const DATA_RECORD_MAPPING_KEY: &str = "data_record_mapping";

// =============================================================================
// DEVICE FILE
// =============================================================================

/// Contents of one vendor device file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceFile {
    /// Device definitions in file order.
    pub device_types: Vec<DeviceType>,
}

impl DeviceFile {
    /// Number of device types in the file.
    pub fn len(&self) -> usize {
        self.device_types.len()
    }

    /// Whether the file holds no device types.
    pub fn is_empty(&self) -> bool {
        self.device_types.is_empty()
    }

    /// Get a device type by position.
    pub fn device(&self, index: usize) -> Option<&DeviceType> {
        self.device_types.get(index)
    }

    /// Get a mutable device type by position.
    pub fn device_mut(&mut self, index: usize) -> Option<&mut DeviceType> {
        self.device_types.get_mut(index)
    }

    /// Append a device type and return its index.
    pub fn push(&mut self, device: DeviceType) -> usize {
        self.device_types.push(device);
        self.device_types.len() - 1
    }

    /// Remove the device type at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<DeviceType> {
        (index < self.device_types.len()).then(|| self.device_types.remove(index))
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// The open-ended configuration sections of a device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `technology_config` (required, carries the discriminator).
    Technology,
    /// `control_config` (optional).
    Control,
    /// `processor_config` (optional).
    Processor,
}

impl Section {
    /// YAML key of the section.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Technology => "technology_config",
            Self::Control => "control_config",
            Self::Processor => "processor_config",
        }
    }

    /// Short label for headings.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Technology => "Technology Config",
            Self::Control => "Control Config",
            Self::Processor => "Processor Config",
        }
    }

    /// All sections in editor order.
    pub const fn all() -> &'static [Section] {
        &[Self::Technology, Self::Control, Self::Processor]
    }
}

// =============================================================================
// DEVICE TYPE
// =============================================================================

/// One device definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceType {
    /// Producer name.
    pub vendor_name: String,

    /// Model identifier.
    pub model_number: String,

    /// Display name.
    pub name: String,

    /// Category, one of [`crate::options::DEVICE_CATEGORIES`].
    pub device_type: String,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Technology section; its `technology` key is the discriminator.
    pub technology_config: Mapping,

    /// Control/capability section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_config: Option<Mapping>,

    /// Processing/decoder section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor_config: Option<Mapping>,

    /// Metric definitions, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Mapping>,

    /// Validation rules, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Mapping>,
}

impl DeviceType {
    /// Create a new device type with the editor defaults.
    ///
    /// The technology defaults to Modbus and the control and processor
    /// sections start out empty.
    pub fn new_for_vendor(vendor_name: impl Into<String>) -> Self {
        let mut technology_config = Mapping::new();
        technology_config.insert(
            TECHNOLOGY_KEY.into(),
            Technology::default().as_str().into(),
        );
        Self {
            vendor_name: vendor_name.into(),
            model_number: String::new(),
            name: "New Device".to_string(),
            device_type: DEFAULT_CATEGORY.to_string(),
            description: None,
            technology_config,
            control_config: Some(Mapping::new()),
            processor_config: Some(Mapping::new()),
            metrics: None,
            validation: None,
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    /// Borrow a section, `None` when an optional section is absent.
    pub fn section(&self, section: Section) -> Option<&Mapping> {
        match section {
            Section::Technology => Some(&self.technology_config),
            Section::Control => self.control_config.as_ref(),
            Section::Processor => self.processor_config.as_ref(),
        }
    }

    /// Replace a section wholesale.
    ///
    /// `None` removes an optional section; for the technology section it
    /// resets to an empty mapping.
    pub fn set_section(&mut self, section: Section, value: Option<Mapping>) {
        match section {
            Section::Technology => self.technology_config = value.unwrap_or_default(),
            Section::Control => self.control_config = value,
            Section::Processor => self.processor_config = value,
        }
    }

    fn control_mut(&mut self) -> &mut Mapping {
        self.control_config.get_or_insert_with(Mapping::new)
    }

    fn processor_mut(&mut self) -> &mut Mapping {
        self.processor_config.get_or_insert_with(Mapping::new)
    }

    // ========================================================================
    // Technology discriminator
    // ========================================================================

    /// Raw technology discriminator, empty when missing.
    pub fn technology(&self) -> &str {
        str_value(&self.technology_config, TECHNOLOGY_KEY)
    }

    /// Parsed technology discriminator.
    pub fn technology_kind(&self) -> Option<Technology> {
        Self::technology_in(&self.technology_config)
    }

    /// Known technology named by a technology section, if any.
    pub fn technology_in(config: &Mapping) -> Option<Technology> {
        str_value(config, TECHNOLOGY_KEY).parse().ok()
    }

    /// Set the technology discriminator.
    pub fn set_technology(&mut self, technology: Technology) {
        self.technology_config
            .insert(TECHNOLOGY_KEY.into(), technology.as_str().into());
    }

    /// Whether the device uses register-based configuration.
    pub fn is_register_based(&self) -> bool {
        self.technology_kind().is_some_and(|t| t.has_registers())
    }

    // ========================================================================
    // Registers (Modbus)
    // ========================================================================

    fn register_list(&self) -> Option<&Vec<Value>> {
        self.technology_config
            .get(REGISTERS_KEY)
            .and_then(Value::as_sequence)
    }

    fn existing_register_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.technology_config
            .get_mut(REGISTERS_KEY)
            .and_then(Value::as_sequence_mut)
    }

    fn register_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        let slot = self
            .technology_config
            .entry(REGISTERS_KEY.into())
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if !slot.is_sequence() {
            *slot = Value::Sequence(Vec::new());
        }
        slot.as_sequence_mut()
    }

    /// Typed snapshot of the register definitions.
    pub fn registers(&self) -> Vec<RegisterDefinition> {
        self.register_list()
            .map(|seq| seq.iter().map(RegisterDefinition::from_value).collect())
            .unwrap_or_default()
    }

    /// Number of register definitions.
    pub fn register_count(&self) -> usize {
        self.register_list().map_or(0, Vec::len)
    }

    /// Mutable handle on one register definition.
    ///
    /// Nothing is written until a setter runs on the handle.
    pub fn register_mut(&mut self, index: usize) -> Option<RegisterMut<'_>> {
        self.existing_register_list_mut()?
            .get_mut(index)
            .map(RegisterMut::new)
    }

    /// Append a register definition and return its index.
    pub fn push_register(&mut self, register: Mapping) -> usize {
        match self.register_list_mut() {
            Some(list) => {
                list.push(Value::Mapping(register));
                list.len() - 1
            }
            None => 0,
        }
    }

    /// Remove the register definition at `index`.
    pub fn remove_register(&mut self, index: usize) -> Option<Value> {
        let list = self.existing_register_list_mut()?;
        (index < list.len()).then(|| list.remove(index))
    }

    // ========================================================================
    // LoRaWAN
    // ========================================================================

    /// LoRaWAN device class, empty when unset.
    pub fn device_class(&self) -> &str {
        str_value(&self.technology_config, DEVICE_CLASS_KEY)
    }

    /// Set the LoRaWAN device class. Empty removes the key.
    pub fn set_device_class(&mut self, class: &str) {
        set_or_remove(&mut self.technology_config, DEVICE_CLASS_KEY, class);
    }

    // ========================================================================
    // wM-Bus
    // ========================================================================

    /// wM-Bus manufacturer code, empty when unset.
    pub fn manufacturer_code(&self) -> &str {
        str_value(&self.technology_config, MANUFACTURER_CODE_KEY)
    }

    /// Set the wM-Bus manufacturer code.
    pub fn set_manufacturer_code(&mut self, code: &str) {
        self.technology_config
            .insert(MANUFACTURER_CODE_KEY.into(), code.into());
    }

    /// wM-Bus device type code, 0 when unset.
    pub fn wmbus_device_type(&self) -> u64 {
        self.technology_config
            .get(WMBUS_DEVICE_TYPE_KEY)
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Set the wM-Bus device type code.
    pub fn set_wmbus_device_type(&mut self, code: u8) {
        self.technology_config
            .insert(WMBUS_DEVICE_TYPE_KEY.into(), u64::from(code).into());
    }

    /// Whether wM-Bus telegrams are encrypted.
    pub fn encryption_required(&self) -> bool {
        bool_value(&self.technology_config, ENCRYPTION_REQUIRED_KEY)
    }

    /// Set the wM-Bus encryption flag.
    pub fn set_encryption_required(&mut self, required: bool) {
        self.technology_config
            .insert(ENCRYPTION_REQUIRED_KEY.into(), required.into());
    }

    /// Shared wM-Bus encryption key, empty when unset.
    pub fn shared_encryption_key(&self) -> &str {
        str_value(&self.technology_config, SHARED_KEY_KEY)
    }

    /// Set the shared wM-Bus key. Empty removes the key.
    pub fn set_shared_encryption_key(&mut self, key: &str) {
        set_or_remove(&mut self.technology_config, SHARED_KEY_KEY, key);
    }

    /// Number of wM-Bus data record mappings.
    pub fn data_record_mapping_count(&self) -> usize {
        self.technology_config
            .get(DATA_RECORD_MAPPING_KEY)
            .and_then(Value::as_sequence)
            .map_or(0, Vec::len)
    }

    // ========================================================================
    // Control / processor
    // ========================================================================

    /// Whether the device accepts control commands.
    pub fn is_controllable(&self) -> bool {
        self.control_config
            .as_ref()
            .is_some_and(|c| bool_value(c, CONTROLLABLE_KEY))
    }

    /// Set the controllable flag.
    pub fn set_controllable(&mut self, controllable: bool) {
        self.control_mut()
            .insert(CONTROLLABLE_KEY.into(), controllable.into());
    }

    /// Decoder used by the processor, empty when unset.
    pub fn decoder_type(&self) -> &str {
        self.processor_config
            .as_ref()
            .map_or("", |p| str_value(p, DECODER_TYPE_KEY))
    }

    /// Set the decoder type. Empty removes the key.
    pub fn set_decoder_type(&mut self, decoder: &str) {
        set_or_remove(self.processor_mut(), DECODER_TYPE_KEY, decoder);
    }

    /// Description or empty string.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn str_value<'a>(map: &'a Mapping, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("")
}

fn bool_value(map: &Mapping, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn set_or_remove(map: &mut Mapping, key: &str, value: &str) {
    if value.is_empty() {
        map.shift_remove(key);
    } else {
        map.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::RegisterDefinition;

    #[test]
    fn test_new_device_defaults() {
        let device = DeviceType::new_for_vendor("Acme");
        assert_eq!(device.vendor_name, "Acme");
        assert_eq!(device.name, "New Device");
        assert_eq!(device.device_type, "power_meter");
        assert_eq!(device.technology(), "modbus");
        assert!(device.is_register_based());
        assert_eq!(device.register_count(), 0);
        assert!(device.control_config.as_ref().is_some_and(Mapping::is_empty));
    }

    #[test]
    fn test_decoder_type_empty_removes_key() {
        let mut device = DeviceType::new_for_vendor("Acme");
        device.set_decoder_type("em_decoder");
        assert_eq!(device.decoder_type(), "em_decoder");

        device.set_decoder_type("");
        assert_eq!(device.decoder_type(), "");
        assert!(
            !device
                .processor_config
                .as_ref()
                .unwrap()
                .contains_key("decoder_type")
        );
    }

    #[test]
    fn test_controllable_creates_section() {
        let mut device = DeviceType::new_for_vendor("Acme");
        device.control_config = None;
        assert!(!device.is_controllable());

        device.set_controllable(true);
        assert!(device.is_controllable());
    }

    #[test]
    fn test_register_list_add_edit_remove() {
        let mut device = DeviceType::new_for_vendor("Acme");
        let index = device.push_register(RegisterDefinition::default_mapping());
        assert_eq!(index, 0);

        device.register_mut(0).unwrap().set_address(40);
        assert_eq!(device.registers()[0].address, 40);

        assert!(device.remove_register(0).is_some());
        assert_eq!(device.register_count(), 0);
        assert!(device.remove_register(0).is_none());
    }

    #[test]
    fn test_register_lookups_do_not_create_list() {
        let mut device = DeviceType::new_for_vendor("Acme");
        let before = device.clone();

        assert!(device.register_mut(0).is_none());
        assert!(device.remove_register(0).is_none());
        assert_eq!(device, before);
        assert!(!device.technology_config.contains_key(REGISTERS_KEY));

        device
            .technology_config
            .insert(REGISTERS_KEY.into(), Value::Sequence(vec![Value::from(5)]));
        let before = device.clone();
        let register = device.register_mut(0).unwrap();
        assert_eq!(register.snapshot().address, 0);
        assert_eq!(device, before);
    }

    #[test]
    fn test_technology_in_section() {
        let mut config = Mapping::new();
        assert_eq!(DeviceType::technology_in(&config), None);

        config.insert(TECHNOLOGY_KEY.into(), "lorawan".into());
        assert_eq!(DeviceType::technology_in(&config), Some(Technology::Lorawan));

        config.insert(TECHNOLOGY_KEY.into(), "zigbee".into());
        assert_eq!(DeviceType::technology_in(&config), None);

        config.insert(TECHNOLOGY_KEY.into(), Value::from(3));
        assert_eq!(DeviceType::technology_in(&config), None);
    }

    #[test]
    fn test_wmbus_accessors() {
        let mut device = DeviceType::new_for_vendor("Acme");
        device.set_technology(Technology::Wmbus);
        device.set_manufacturer_code("KAM");
        device.set_wmbus_device_type(7);
        device.set_encryption_required(true);
        device.set_shared_encryption_key("00112233");

        assert_eq!(device.manufacturer_code(), "KAM");
        assert_eq!(device.wmbus_device_type(), 7);
        assert!(device.encryption_required());
        assert_eq!(device.shared_encryption_key(), "00112233");
        assert!(!device.is_register_based());

        device.set_shared_encryption_key("");
        assert_eq!(device.shared_encryption_key(), "");
    }
}
