//! Application-level state.
//!
//! This module contains `AppState` which is the root of all state. It is
//! owned by [`crate::app::App`] and only mutated inside the update step.

use spark_model::{
    DeviceFile, DeviceType, Manifest, RegisterDefinition, RegisterMut, VendorEntry,
};
use spark_source::SourceKind;

use super::edit_buffer::EditBuffer;
use super::navigation::{Selection, View};
use super::store::ChangeStore;
use crate::editing::{Editable, EditableField, FieldKey, RegisterFieldKey, register_fields};
use crate::error::{AppError, EditError};

// =============================================================================
// OPERATIONS
// =============================================================================

/// A backend operation that is currently suspended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    FetchIndex,
    FetchCollection { path: String },
    /// Publishing the listed paths.
    Publish { paths: Vec<String> },
}

impl Operation {
    /// Text for the loading view.
    pub fn label(&self) -> String {
        match self {
            Self::FetchIndex => "Loading manifest".to_string(),
            Self::FetchCollection { path } => format!("Loading {path}"),
            Self::Publish { paths } => format!("Publishing {} file(s)", paths.len()),
        }
    }
}

// =============================================================================
// STATUS LINE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

// =============================================================================
// APP STATE
// =============================================================================

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Current view/screen
    pub view: View,
    /// Cursor positions
    pub selection: Selection,
    /// Manifest, once fetched
    pub manifest: Option<Manifest>,
    /// Loaded vendor files
    pub store: ChangeStore,
    /// Storage path of the vendor file being browsed
    pub current_path: Option<String>,
    /// Edit in progress
    pub edit: Option<EditBuffer>,
    /// Last status message
    pub status: Option<Status>,
    /// Error shown in the error view
    pub error: Option<AppError>,
    /// Loading indicator frame
    pub spinner: usize,
    source_kind: SourceKind,
    can_write: bool,
    in_flight: Option<Operation>,
}

impl AppState {
    pub fn new(source_kind: SourceKind, can_write: bool) -> Self {
        Self {
            view: View::default(),
            selection: Selection::default(),
            manifest: None,
            store: ChangeStore::new(),
            current_path: None,
            edit: None,
            status: None,
            error: None,
            spinner: 0,
            source_kind,
            can_write,
            in_flight: None,
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// Whether the backend accepts publishes.
    pub fn can_write(&self) -> bool {
        self.can_write
    }

    // ========================================================================
    // In-flight operation
    // ========================================================================

    pub fn in_flight(&self) -> Option<&Operation> {
        self.in_flight.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start `op` and switch to the loading view.
    ///
    /// Returns false (and changes nothing but the status line) when another
    /// operation is still running.
    pub fn begin(&mut self, op: Operation) -> bool {
        if let Some(current) = &self.in_flight {
            let text = format!("{} is still running", current.label());
            self.set_error_status(text);
            return false;
        }
        tracing::debug!("{}", op.label());
        self.in_flight = Some(op);
        self.view = View::Loading;
        true
    }

    /// Mark the running operation as complete and return it.
    pub fn finish(&mut self) -> Option<Operation> {
        self.in_flight.take()
    }

    // ========================================================================
    // Status and errors
    // ========================================================================

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error_status(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: true,
        });
    }

    /// Report a rejected edit on the status line.
    pub fn reject(&mut self, err: &EditError) {
        tracing::debug!("Edit rejected: {}", err);
        self.set_error_status(err.to_string());
    }

    /// Switch to the error view.
    ///
    /// Unsaved changes are kept; only the edit buffer is dropped.
    pub fn fail(&mut self, err: AppError) {
        tracing::warn!("{}", err);
        self.edit = None;
        self.error = Some(err);
        self.view = View::Error;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switch views, dropping any edit buffer.
    ///
    /// Entering a field list resets its cursor.
    pub fn navigate(&mut self, view: View) {
        if view != self.view {
            match view {
                View::RecordEdit => self.selection.field = 0,
                View::SubEntryEdit => self.selection.register_field = 0,
                _ => {}
            }
        }
        self.edit = None;
        self.view = view;
    }

    /// Step back to the parent view, if any.
    pub fn back(&mut self) {
        if let Some(parent) = self.view.parent() {
            // Returning from a child of the field list keeps its cursor.
            let field = self.selection.field;
            self.navigate(parent);
            if parent == View::RecordEdit {
                self.selection.field = field;
            }
        }
    }

    /// Crumbs for the header: Vendors, vendor, device, Registers.
    pub fn breadcrumb(&self) -> Vec<String> {
        let depth = self.view.depth();
        let mut crumbs = vec!["Vendors".to_string()];
        if depth >= 1
            && let Some(vendor) = self.current_vendor()
        {
            crumbs.push(vendor.name.clone());
        }
        if depth >= 2
            && let Some(device) = self.current_device()
        {
            crumbs.push(device.name.clone());
        }
        if depth >= 3 {
            crumbs.push("Registers".to_string());
        }
        crumbs
    }

    // ========================================================================
    // Data access
    // ========================================================================

    pub fn vendor_count(&self) -> usize {
        self.manifest.as_ref().map_or(0, Manifest::vendor_count)
    }

    /// Vendor under the group cursor.
    pub fn current_vendor(&self) -> Option<&VendorEntry> {
        self.manifest.as_ref()?.vendor(self.selection.group)
    }

    /// Working copy of the vendor file being browsed.
    pub fn current_file(&self) -> Option<&DeviceFile> {
        self.store.working(self.current_path.as_deref()?)
    }

    pub fn record_count(&self) -> usize {
        self.current_file().map_or(0, DeviceFile::len)
    }

    /// Device type under the record cursor.
    pub fn current_device(&self) -> Option<&DeviceType> {
        self.current_file()?.device(self.selection.record)
    }

    pub fn register_count(&self) -> usize {
        self.current_device().map_or(0, DeviceType::register_count)
    }

    /// Register under the register cursor.
    pub fn current_register(&self) -> Option<RegisterDefinition> {
        self.current_device()?
            .registers()
            .into_iter()
            .nth(self.selection.register)
    }

    pub fn record_fields(&self) -> Vec<EditableField<FieldKey>> {
        self.current_device()
            .map(Editable::fields)
            .unwrap_or_default()
    }

    pub fn register_fields(&self) -> Vec<EditableField<RegisterFieldKey>> {
        self.current_register()
            .map(|reg| register_fields(&reg))
            .unwrap_or_default()
    }

    /// Whether the current vendor file has unpublished changes.
    pub fn current_is_dirty(&self) -> bool {
        self.current_path
            .as_deref()
            .and_then(|path| self.store.get(path))
            .is_some_and(|state| state.is_dirty())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Mutate the current vendor file. Marks it dirty on success.
    pub fn modify_file<T>(
        &mut self,
        f: impl FnOnce(&mut DeviceFile) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let path = self.current_path.as_deref().ok_or(EditError::NoSelection)?;
        self.store
            .modify(path, f)
            .unwrap_or(Err(EditError::NoSelection))
    }

    /// Mutate the current device type. Marks its file dirty on success.
    pub fn modify_device<T>(
        &mut self,
        f: impl FnOnce(&mut DeviceType) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let index = self.selection.record;
        self.modify_file(|file| f(file.device_mut(index).ok_or(EditError::NoSelection)?))
    }

    /// Mutate the register under the cursor. Marks its file dirty on success.
    pub fn modify_register<T>(
        &mut self,
        f: impl FnOnce(&mut RegisterMut<'_>) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let index = self.selection.register;
        self.modify_device(|device| {
            let mut register = device.register_mut(index).ok_or(EditError::NoSelection)?;
            f(&mut register)
        })
    }
}
