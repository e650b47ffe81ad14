//! Fixed option lists for enumerated fields.
//!
//! The editor cycles through these lists and rejects values outside them.

use std::fmt;
use std::str::FromStr;

/// Device categories (`device_type` key).
pub const DEVICE_CATEGORIES: &[&str] = &[
    "power_meter",
    "gateway",
    "environment_sensor",
    "water_meter",
    "heat_meter",
];

/// Technology discriminator values.
pub const TECHNOLOGIES: &[&str] = &["modbus", "lorawan", "wmbus"];

/// Yes/no choices rendered as strings.
pub const BOOLEAN_VALUES: &[&str] = &["true", "false"];

/// Modbus register data types.
pub const DATA_TYPES: &[&str] = &["uint16", "int16", "uint32", "int32", "float32"];

/// LoRaWAN device classes.
pub const LORAWAN_CLASSES: &[&str] = &["A", "B", "C"];

/// Common wM-Bus device type codes.
///
/// 0 other, 2 electricity, 3 gas, 4 heat, 6 hot water, 7 water,
/// 8 heat cost allocator.
pub const WMBUS_DEVICE_TYPES: &[&str] = &["0", "2", "3", "4", "6", "7", "8"];

/// Category assigned to newly created device types.
pub const DEFAULT_CATEGORY: &str = "power_meter";

// =============================================================================
// TECHNOLOGY
// =============================================================================

/// Technology discriminator of a device type.
///
/// Selects the shape of the `technology_config` section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    /// Register-based (Modbus).
    #[default]
    Modbus,
    /// Radio-class-based (LoRaWAN).
    Lorawan,
    /// Wireless meter (wM-Bus).
    Wmbus,
}

impl Technology {
    /// Value stored in the YAML document.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modbus => "modbus",
            Self::Lorawan => "lorawan",
            Self::Wmbus => "wmbus",
        }
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Modbus => "Modbus",
            Self::Lorawan => "LoRaWAN",
            Self::Wmbus => "wM-Bus",
        }
    }

    /// All technologies in option order.
    pub const fn all() -> &'static [Technology] {
        &[Self::Modbus, Self::Lorawan, Self::Wmbus]
    }

    /// Whether this technology owns a register list.
    pub const fn has_registers(&self) -> bool {
        matches!(self, Self::Modbus)
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modbus" => Ok(Self::Modbus),
            "lorawan" => Ok(Self::Lorawan),
            "wmbus" => Ok(Self::Wmbus),
            other => Err(format!("unknown technology '{other}'")),
        }
    }
}

// =============================================================================
// DATA TYPE
// =============================================================================

/// Encoding of a Modbus register value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Unsigned 16-bit integer (one register).
    #[default]
    Uint16,
    /// Signed 16-bit integer (one register).
    Int16,
    /// Unsigned 32-bit integer (two registers).
    Uint32,
    /// Signed 32-bit integer (two registers).
    Int32,
    /// IEEE-754 single precision float (two registers).
    Float32,
}

impl DataType {
    /// Value stored in the YAML document.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Float32 => "float32",
        }
    }

    /// Number of 16-bit registers the value occupies.
    pub const fn register_width(&self) -> u8 {
        match self {
            Self::Uint16 | Self::Int16 => 1,
            Self::Uint32 | Self::Int32 | Self::Float32 => 2,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint16" => Ok(Self::Uint16),
            "int16" => Ok(Self::Int16),
            "uint32" => Ok(Self::Uint32),
            "int32" => Ok(Self::Int32),
            "float32" => Ok(Self::Float32),
            other => Err(format!("unknown data type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_matches_option_list() {
        let names: Vec<&str> = Technology::all().iter().map(Technology::as_str).collect();
        assert_eq!(names, TECHNOLOGIES);
        for name in TECHNOLOGIES {
            assert_eq!(name.parse::<Technology>().unwrap().as_str(), *name);
        }
        assert!("zigbee".parse::<Technology>().is_err());
    }

    #[test]
    fn test_data_type_round_trips_option_list() {
        for name in DATA_TYPES {
            assert_eq!(name.parse::<DataType>().unwrap().as_str(), *name);
        }
        assert_eq!(DataType::Float32.register_width(), 2);
        assert!("float64".parse::<DataType>().is_err());
    }
}
