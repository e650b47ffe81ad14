//! Storage backends for the Spark device library.
//!
//! A [`Source`] fetches the manifest and vendor device files and publishes a
//! batch of changed files. Two variants exist:
//!
//! - [`LocalSource`] reads and writes a local checkout directly.
//! - [`RemoteSource`] reads a hosted repository through a [`ContentApi`] and
//!   publishes by creating a branch, updating each file with its content hash,
//!   and opening a pull request. [`GitHubClient`] is the production
//!   [`ContentApi`]; [`MemoryContentApi`] keeps everything in memory.
//!
//! Concurrency tokens are opaque to callers: they are captured by
//! [`Source::fetch_collection`] and handed back unchanged in a
//! [`PublishRequest`].

pub mod error;
pub mod local;
pub mod remote;
pub mod source;

pub use error::{ErrorKind, Result, SourceError};
pub use local::LocalSource;
pub use remote::{ContentApi, GitHubClient, MemoryContentApi, RemoteSource, resolve_token};
pub use source::{
    ConcurrencyToken, FetchedCollection, FileChange, PublishRequest, Published, Source, SourceKind,
};
