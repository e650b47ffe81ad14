//! sparkctl - terminal editor for the Spark device library
//!
//! Browses vendors and device types listed in `manifest.yaml`, edits them in
//! memory, and publishes the changed vendor files either to a local checkout
//! or as a GitHub pull request.
//!
//! Built on ratatui using the Elm architecture (State, Message, Update, View).

// Core modules
pub mod app;
pub mod message;
pub mod state;
pub mod task;
pub mod theme;
pub mod view;

// Update logic
pub mod editing;
pub mod error;
pub mod handler;
pub mod publish;

// Terminal and process plumbing
pub mod cli;
pub mod keys;
pub mod logging;
pub mod runtime;
pub mod settings;
