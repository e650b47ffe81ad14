//! Manifest document types.

use serde::{Deserialize, Serialize};

/// Directory (relative to the library root) that holds vendor device files.
pub const DEVICES_DIR: &str = "devices";

/// Path of the manifest relative to the library root.
pub const MANIFEST_PATH: &str = "manifest.yaml";

/// The `manifest.yaml` index of the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Library version string.
    pub version: String,

    /// Release date, if the library has been released.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,

    /// Schema version of the device documents.
    pub schema_version: u32,

    /// Vendors in display order.
    #[serde(default)]
    pub vendors: Vec<VendorEntry>,
}

impl Manifest {
    /// Get a vendor by position.
    pub fn vendor(&self, index: usize) -> Option<&VendorEntry> {
        self.vendors.get(index)
    }

    /// Number of vendors listed.
    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }
}

/// One vendor in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorEntry {
    /// Display name.
    pub name: String,

    /// Device file name inside [`DEVICES_DIR`].
    pub file: String,

    /// Technologies used by this vendor's devices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
}

impl VendorEntry {
    /// Storage path of the vendor's device file, relative to the library root.
    pub fn storage_path(&self) -> String {
        format!("{DEVICES_DIR}/{}", self.file)
    }

    /// Comma-separated technology tags for display.
    pub fn technology_tags(&self) -> String {
        self.technologies.join(", ")
    }
}
