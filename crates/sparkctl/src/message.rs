//! Messages consumed by the state machine.
//!
//! Every input reaches [`crate::app::App::update`] as a [`Message`]: key
//! presses from the input thread, completions of backend operations, and
//! periodic ticks driving the loading indicator.

use spark_model::Manifest;
use spark_source::{FetchedCollection, Published, SourceError};

/// A terminal-agnostic key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// A character typed with Ctrl held.
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

impl Key {
    /// Whether the key moves the cursor up in a list.
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up | Self::Char('k'))
    }

    /// Whether the key moves the cursor down in a list.
    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down | Self::Char('j'))
    }

    /// Whether the key steps back one view.
    pub fn is_back(&self) -> bool {
        matches!(self, Self::Esc | Self::Backspace)
    }
}

/// Root message type.
#[derive(Debug)]
pub enum Message {
    /// A key was pressed.
    Key(Key),

    /// The manifest fetch finished.
    IndexLoaded(Result<Manifest, SourceError>),

    /// A vendor file fetch finished.
    CollectionLoaded {
        path: String,
        result: Result<FetchedCollection, SourceError>,
    },

    /// A publish finished.
    Published(Result<Published, SourceError>),

    /// Periodic redraw.
    Tick,
}
