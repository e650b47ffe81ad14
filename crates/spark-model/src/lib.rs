//! Data model for the Spark device library.
//!
//! The library is a set of YAML documents:
//!
//! - `manifest.yaml` lists every vendor and the device file that holds its
//!   definitions ([`Manifest`], [`VendorEntry`]).
//! - `devices/<vendor>.yaml` holds an ordered list of device types
//!   ([`DeviceFile`], [`DeviceType`]).
//!
//! Device types carry a handful of strongly typed identity fields and three
//! open-ended configuration sections. The sections are kept as ordered YAML
//! mappings so unknown keys survive a load/save cycle untouched; typed
//! accessors cover the keys the editor knows about (technology, registers,
//! LoRaWAN class, wM-Bus parameters, decoder type, ...).
//!
//! # Architecture
//!
//! - `manifest` - Manifest and vendor entries
//! - `device` - Device files, device types and section accessors
//! - `register` - Modbus register definitions
//! - `options` - Fixed option lists used by enumerated fields
//! - `codec` - YAML parsing and serialization
//! - `error` - Error types

pub mod codec;
pub mod device;
pub mod error;
pub mod manifest;
pub mod options;
pub mod register;

pub use codec::{
    parse_device_file, parse_manifest, parse_section, section_to_yaml, serialize_device_file,
};
pub use device::{DeviceFile, DeviceType, Section};
pub use error::{ModelError, Result};
pub use manifest::{Manifest, VendorEntry};
pub use options::{DataType, Technology};
pub use register::{RegisterDefinition, RegisterMut};

/// Re-export of the mapping type used for open-ended sections.
pub type ConfigMap = serde_yaml::Mapping;
