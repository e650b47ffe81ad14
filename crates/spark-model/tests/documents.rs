//! Tests for document parsing, serialization and record copies.

use proptest::prelude::*;
use spark_model::options::{DATA_TYPES, DEVICE_CATEGORIES, TECHNOLOGIES};
use spark_model::{
    DataType, DeviceFile, DeviceType, RegisterDefinition, Section, Technology, parse_device_file,
    parse_section, section_to_yaml, serialize_device_file,
};

// =========================================================================
// Strategies
// =========================================================================

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _.-]{0,16}"
}

fn register() -> impl Strategy<Value = (String, String, u16, usize, i32)> {
    (
        "[a-z_]{1,12}",
        "[A-Za-z%]{0,4}",
        any::<u16>(),
        0..DATA_TYPES.len(),
        -1000i32..1000,
    )
}

fn device() -> impl Strategy<Value = DeviceType> {
    (
        text(),
        text(),
        text(),
        0..DEVICE_CATEGORIES.len(),
        proptest::option::of(text()),
        0..TECHNOLOGIES.len(),
        proptest::collection::vec(register(), 0..4),
        any::<bool>(),
        text(),
    )
        .prop_map(
            |(vendor, model, name, category, description, tech, regs, controllable, decoder)| {
                let mut device = DeviceType::new_for_vendor(vendor);
                device.model_number = model;
                device.name = name;
                device.device_type = DEVICE_CATEGORIES[category].to_string();
                device.description = description;
                device.set_technology(Technology::all()[tech]);
                for (field, unit, address, data_type, scale) in regs {
                    let index = device.push_register(RegisterDefinition::default_mapping());
                    let mut reg = device.register_mut(index).unwrap();
                    reg.set_field_name(&field);
                    reg.set_field_unit(&unit);
                    reg.set_address(address);
                    reg.set_data_type(DATA_TYPES[data_type].parse::<DataType>().unwrap());
                    reg.set_scale(f64::from(scale) / 8.0);
                }
                device.set_controllable(controllable);
                device.set_decoder_type(&decoder);
                device
            },
        )
}

// =========================================================================
// Round trip
// =========================================================================

proptest! {
    #[test]
    fn device_file_round_trips(devices in proptest::collection::vec(device(), 0..4)) {
        let file = DeviceFile { device_types: devices };
        let text = serialize_device_file(&file).unwrap();
        prop_assert_eq!(parse_device_file(&text).unwrap(), file);
    }

    #[test]
    fn section_round_trips(device in device()) {
        for section in Section::all() {
            let text = section_to_yaml(device.section(*section)).unwrap();
            let parsed = parse_section(*section, &text).unwrap();
            prop_assert_eq!(parsed.as_ref(), device.section(*section));
        }
    }
}

// =========================================================================
// Copies
// =========================================================================

#[test]
fn test_cloned_file_is_independent() {
    let mut original = DeviceFile::default();
    let mut device = DeviceType::new_for_vendor("Acme");
    device.push_register(RegisterDefinition::default_mapping());
    original.push(device);

    let mut working = original.clone();
    let edited = working.device_mut(0).unwrap();
    edited.name = "Changed".to_string();
    edited.register_mut(0).unwrap().set_address(17);
    edited.set_controllable(true);

    let untouched = original.device(0).unwrap();
    assert_eq!(untouched.name, "New Device");
    assert_eq!(untouched.registers()[0].address, 0);
    assert!(!untouched.is_controllable());
}

#[test]
fn test_unknown_keys_survive_round_trip() {
    let text = r#"
device_types:
  - vendor_name: Acme
    model_number: X1
    name: Sensor
    device_type: environment_sensor
    technology_config:
      technology: lorawan
      device_class: A
      join_eui: 70B3D57ED0000000
    validation:
      temperature: { min: -40, max: 85 }
"#;
    let file = parse_device_file(text).unwrap();
    let out = serialize_device_file(&file).unwrap();
    assert!(out.contains("join_eui"));
    assert!(out.contains("validation"));
    assert_eq!(file.device(0).unwrap().device_class(), "A");
}
