//! The storage backend contract.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use spark_model::{DeviceFile, Manifest};

use crate::error::Result;

/// Opaque optimistic-concurrency token captured when a file is fetched.
///
/// The remote backend stores the content hash here; the local backend stores
/// the path. Callers only carry it from fetch to publish.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which backend variant is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Local,
    GitHub,
}

impl SourceKind {
    /// Badge text for the header.
    pub const fn badge(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::GitHub => "GITHUB",
        }
    }
}

/// A parsed device file together with its token.
#[derive(Debug, Clone)]
pub struct FetchedCollection {
    pub file: DeviceFile,
    pub token: ConcurrencyToken,
}

/// Serialized content of one changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub content: String,
    pub token: ConcurrencyToken,
}

/// Everything a backend needs to publish a batch of changes.
///
/// Changes are applied in path order.
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub title: String,
    pub body: String,
    pub changes: BTreeMap<String, FileChange>,
}

impl PublishRequest {
    /// Number of files in the batch.
    pub fn file_count(&self) -> usize {
        self.changes.len()
    }
}

/// Where a successful publish landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    /// Files were written to the local tree.
    Saved { count: usize },
    /// A pull request was opened.
    PullRequest { url: String },
}

impl fmt::Display for Published {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved { count } => write!(f, "saved {count} file(s)"),
            Self::PullRequest { url } => write!(f, "PR created: {url}"),
        }
    }
}

/// A device library storage backend.
///
/// Implementations are shared between the UI and spawned tasks, so they must
/// be `Send + Sync`.
#[async_trait]
pub trait Source: Send + Sync {
    /// Which variant this is.
    fn kind(&self) -> SourceKind;

    /// Fetch and parse the manifest.
    async fn fetch_index(&self) -> Result<Manifest>;

    /// Fetch and parse one vendor device file.
    async fn fetch_collection(&self, path: &str) -> Result<FetchedCollection>;

    /// Whether [`Source::publish`] is supported.
    fn can_write(&self) -> bool;

    /// Write every change in the request.
    ///
    /// Stops at the first failing file. Files written before the failure stay
    /// written.
    async fn publish(&self, request: &PublishRequest) -> Result<Published>;
}
