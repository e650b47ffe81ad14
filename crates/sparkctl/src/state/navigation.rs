//! Navigation state types.
//!
//! This module contains the view enum and the selection cursors:
//! - `View`: Current screen
//! - `Selection`: Cursor position within each list

use spark_model::Section;

// =============================================================================
// VIEW ENUM
// =============================================================================

/// Current view/screen of the editor.
///
/// Quitting is only possible from [`View::GroupList`]; every other view steps
/// back through the hierarchy first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Waiting for the manifest or a vendor file
    #[default]
    Loading,

    /// Vendors from the manifest
    GroupList,

    /// Device types of the selected vendor
    RecordList,

    /// Read-only summary of one device type
    RecordDetail,

    /// Field list of one device type
    RecordEdit,

    /// Multi-line YAML editor for one section
    ConfigBlobEdit(Section),

    /// Register list of a Modbus device type
    SubListView,

    /// Field list of one register
    SubEntryEdit,

    /// Publish confirmation
    ConfirmPublish,

    /// Last backend failure
    Error,
}

impl View {
    /// The view Esc/Backspace returns to, if any.
    pub fn parent(&self) -> Option<View> {
        match self {
            Self::RecordList => Some(Self::GroupList),
            Self::RecordDetail => Some(Self::RecordList),
            Self::RecordEdit => Some(Self::RecordDetail),
            Self::ConfigBlobEdit(_) | Self::SubListView => Some(Self::RecordEdit),
            Self::SubEntryEdit => Some(Self::SubListView),
            Self::ConfirmPublish | Self::Error => Some(Self::GroupList),
            Self::Loading | Self::GroupList => None,
        }
    }

    /// Breadcrumb depth: 0 vendors, 1 vendor, 2 device, 3 registers.
    pub fn depth(&self) -> usize {
        match self {
            Self::Loading | Self::GroupList | Self::ConfirmPublish | Self::Error => 0,
            Self::RecordList => 1,
            Self::RecordDetail | Self::RecordEdit | Self::ConfigBlobEdit(_) => 2,
            Self::SubListView | Self::SubEntryEdit => 3,
        }
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Cursor positions for every list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Index into the manifest's vendors
    pub group: usize,
    /// Index into the vendor file's device types
    pub record: usize,
    /// Index into the device type field list
    pub field: usize,
    /// Index into the register list
    pub register: usize,
    /// Index into the register field list
    pub register_field: usize,
}

/// Move a cursor up by one, stopping at 0.
pub fn step_up(cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1);
}

/// Move a cursor down by one, stopping at the last of `len` entries.
pub fn step_down(cursor: &mut usize, len: usize) {
    if *cursor + 1 < len {
        *cursor += 1;
    }
}

/// Clamp a cursor into `0..len` (0 when empty).
pub fn clamp(cursor: &mut usize, len: usize) {
    *cursor = (*cursor).min(len.saturating_sub(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_chain_reaches_group_list() {
        let mut view = View::SubEntryEdit;
        let mut hops = 0;
        while let Some(parent) = view.parent() {
            view = parent;
            hops += 1;
        }
        assert_eq!(view, View::GroupList);
        assert_eq!(hops, 5);
    }

    #[test]
    fn test_cursor_helpers() {
        let mut cursor = 0;
        step_up(&mut cursor);
        assert_eq!(cursor, 0);

        step_down(&mut cursor, 2);
        step_down(&mut cursor, 2);
        assert_eq!(cursor, 1);

        clamp(&mut cursor, 1);
        assert_eq!(cursor, 0);
        cursor = 5;
        clamp(&mut cursor, 0);
        assert_eq!(cursor, 0);
    }
}
