//! Content API consumed by the remote backend.

use async_trait::async_trait;

use crate::error::Result;

/// A file as stored on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded file content.
    pub content: String,
    /// Content hash required to update the file.
    pub sha: String,
}

/// Content-PUT request for one file.
#[derive(Debug, Clone)]
pub struct FileUpdate<'a> {
    pub path: &'a str,
    pub content: &'a str,
    /// Hash captured at fetch time.
    pub sha: &'a str,
    pub branch: &'a str,
    pub message: &'a str,
}

/// Pull request to open.
#[derive(Debug, Clone)]
pub struct NewPullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

/// Hosted repository content operations.
///
/// Every failure maps to one of NotFound, Auth, Conflict or Transport.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetch a file as it exists on `branch`.
    async fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFile>;

    /// Commit hash at the tip of `branch`.
    async fn get_branch_tip(&self, branch: &str) -> Result<String>;

    /// Create `branch` pointing at `sha`.
    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()>;

    /// Update a file on a branch. Fails with Conflict on a stale hash.
    async fn put_file(&self, update: &FileUpdate<'_>) -> Result<()>;

    /// Open a pull request and return its URL.
    async fn create_pull_request(&self, request: &NewPullRequest<'_>) -> Result<String>;
}
