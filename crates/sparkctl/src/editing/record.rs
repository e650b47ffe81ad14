//! Editable fields of a device type.

use spark_model::options::{
    BOOLEAN_VALUES, DEVICE_CATEGORIES, LORAWAN_CLASSES, TECHNOLOGIES, WMBUS_DEVICE_TYPES,
};
use spark_model::{DeviceType, Section, Technology};

use super::{Editable, EditableField, FieldKind, check_choice};
use crate::error::EditError;

const EDIT_YAML: &str = "[Edit YAML...]";

/// Identifies a device type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    VendorName,
    ModelNumber,
    Name,
    Category,
    Description,
    Technology,
    DeviceClass,
    ManufacturerCode,
    WmbusDeviceType,
    EncryptionRequired,
    SharedEncryptionKey,
    Controllable,
    DecoderType,
    Registers,
    Section(Section),
}

impl FieldKey {
    /// Key name shown in the editor.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VendorName => "vendor_name",
            Self::ModelNumber => "model_number",
            Self::Name => "name",
            Self::Category => "device_type",
            Self::Description => "description",
            Self::Technology => "technology",
            Self::DeviceClass => "device_class",
            Self::ManufacturerCode => "manufacturer_code",
            Self::WmbusDeviceType => "wmbus_device_type",
            Self::EncryptionRequired => "encryption_required",
            Self::SharedEncryptionKey => "shared_encryption_key",
            Self::Controllable => "controllable",
            Self::DecoderType => "decoder_type",
            Self::Registers => "registers",
            Self::Section(section) => section.key(),
        }
    }

    const fn kind(&self) -> FieldKind {
        match self {
            Self::VendorName | Self::ModelNumber | Self::Name | Self::ManufacturerCode => {
                FieldKind::Text { optional: false }
            }
            Self::Description | Self::DecoderType | Self::SharedEncryptionKey => {
                FieldKind::Text { optional: true }
            }
            Self::Category => FieldKind::Choice {
                options: DEVICE_CATEGORIES,
                optional: false,
            },
            Self::Technology => FieldKind::Choice {
                options: TECHNOLOGIES,
                optional: false,
            },
            Self::DeviceClass => FieldKind::Choice {
                options: LORAWAN_CLASSES,
                optional: true,
            },
            Self::WmbusDeviceType => FieldKind::Choice {
                options: WMBUS_DEVICE_TYPES,
                optional: false,
            },
            Self::EncryptionRequired | Self::Controllable => FieldKind::Choice {
                options: BOOLEAN_VALUES,
                optional: false,
            },
            Self::Registers => FieldKind::SubList,
            Self::Section(section) => FieldKind::Blob(*section),
        }
    }

    fn field(self, value: String) -> EditableField<FieldKey> {
        EditableField {
            key: self,
            label: self.name(),
            kind: self.kind(),
            value,
        }
    }
}

fn bool_str(value: bool) -> String {
    value.to_string()
}

impl Editable for DeviceType {
    type Key = FieldKey;

    fn fields(&self) -> Vec<EditableField<FieldKey>> {
        let technology = self.technology_kind();
        let mut fields = vec![
            FieldKey::VendorName.field(self.vendor_name.clone()),
            FieldKey::ModelNumber.field(self.model_number.clone()),
            FieldKey::Name.field(self.name.clone()),
            FieldKey::Category.field(self.device_type.clone()),
            FieldKey::Description.field(self.description_text().to_string()),
            FieldKey::Technology.field(self.technology().to_string()),
        ];

        match technology {
            Some(Technology::Lorawan) => {
                fields.push(FieldKey::DeviceClass.field(self.device_class().to_string()));
            }
            Some(Technology::Wmbus) => {
                fields.push(FieldKey::ManufacturerCode.field(self.manufacturer_code().to_string()));
                fields.push(FieldKey::WmbusDeviceType.field(self.wmbus_device_type().to_string()));
                fields.push(FieldKey::EncryptionRequired.field(bool_str(self.encryption_required())));
                fields.push(
                    FieldKey::SharedEncryptionKey.field(self.shared_encryption_key().to_string()),
                );
            }
            Some(Technology::Modbus) | None => {}
        }

        fields.push(FieldKey::Controllable.field(bool_str(self.is_controllable())));
        fields.push(FieldKey::DecoderType.field(self.decoder_type().to_string()));

        if technology.is_some_and(|t| t.has_registers()) {
            fields.push(
                FieldKey::Registers
                    .field(format!("[{} registers - Edit...]", self.register_count())),
            );
        }

        for section in Section::all() {
            fields.push(FieldKey::Section(*section).field(EDIT_YAML.to_string()));
        }
        fields
    }

    fn apply(&mut self, key: FieldKey, input: &str) -> Result<(), EditError> {
        let value = input.trim();
        let name = key.name();
        if let FieldKind::Choice { options, optional } = key.kind() {
            check_choice(name, value, options, optional)?;
        }

        match key {
            FieldKey::VendorName => self.vendor_name = value.to_string(),
            FieldKey::ModelNumber => self.model_number = value.to_string(),
            FieldKey::Name => self.name = value.to_string(),
            FieldKey::Category => self.device_type = value.to_string(),
            FieldKey::Description => {
                self.description = (!value.is_empty()).then(|| value.to_string());
            }
            FieldKey::Technology => {
                let technology: Technology = value
                    .parse()
                    .map_err(|_| EditError::invalid_choice(name, value, TECHNOLOGIES))?;
                self.set_technology(technology);
            }
            FieldKey::DeviceClass => self.set_device_class(value),
            FieldKey::ManufacturerCode => self.set_manufacturer_code(value),
            FieldKey::WmbusDeviceType => {
                let code: u8 = value
                    .parse()
                    .map_err(|e| EditError::invalid_number(name, value, e))?;
                self.set_wmbus_device_type(code);
            }
            FieldKey::EncryptionRequired => self.set_encryption_required(value == "true"),
            FieldKey::SharedEncryptionKey => self.set_shared_encryption_key(value),
            FieldKey::Controllable => self.set_controllable(value == "true"),
            FieldKey::DecoderType => self.set_decoder_type(value),
            FieldKey::Registers | FieldKey::Section(_) => {
                return Err(EditError::NotEditable { field: name });
            }
        }
        Ok(())
    }
}
