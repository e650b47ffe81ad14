//! Remote backend: reads from a hosted repository and publishes through a
//! pull request.
//!
//! Publishing is a strictly sequential transaction:
//!
//! 1. resolve the tip of the base branch
//! 2. create `sparkctl-update-<unix seconds>` from that tip
//! 3. PUT each changed file on the new branch with the hash captured at fetch
//! 4. open a pull request from the new branch into the base branch
//!
//! A failure in step 3 leaves the new branch behind with the files written
//! so far. No cleanup is attempted.

pub mod api;
pub mod github;
pub mod memory;
pub mod token;
pub mod types;

use async_trait::async_trait;
use spark_model::manifest::MANIFEST_PATH;
use spark_model::{Manifest, parse_device_file, parse_manifest};

pub use api::{ContentApi, FileUpdate, NewPullRequest, RemoteFile};
pub use github::{DEFAULT_API_URL, GitHubClient};
pub use memory::MemoryContentApi;
pub use token::resolve_token;

use crate::error::{Result, SourceError};
use crate::source::{
    ConcurrencyToken, FetchedCollection, PublishRequest, Published, Source, SourceKind,
};

/// Prefix of branches created by a publish.
pub const BRANCH_PREFIX: &str = "sparkctl-update-";

/// Commit message used for every file update.
pub const COMMIT_MESSAGE: &str = "Update device definitions";

/// Backend that talks to a hosted repository through a [`ContentApi`].
#[derive(Debug)]
pub struct RemoteSource<A> {
    api: A,
    base_branch: String,
}

impl<A: ContentApi> RemoteSource<A> {
    pub fn new(api: A, base_branch: impl Into<String>) -> Self {
        Self {
            api,
            base_branch: base_branch.into(),
        }
    }

    /// The underlying content API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Branch that pull requests target.
    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    async fn fetch_text(&self, path: &str) -> Result<(String, String)> {
        let file = self.api.get_file(path, &self.base_branch).await?;
        Ok((file.content, file.sha))
    }
}

/// Name of the branch for a publish started at `unix_seconds`.
pub fn branch_name(unix_seconds: i64) -> String {
    format!("{BRANCH_PREFIX}{unix_seconds}")
}

#[async_trait]
impl<A: ContentApi> Source for RemoteSource<A> {
    fn kind(&self) -> SourceKind {
        SourceKind::GitHub
    }

    async fn fetch_index(&self) -> Result<Manifest> {
        let (text, _) = self.fetch_text(MANIFEST_PATH).await?;
        parse_manifest(&text).map_err(|e| SourceError::parse(MANIFEST_PATH, &e))
    }

    async fn fetch_collection(&self, path: &str) -> Result<FetchedCollection> {
        let (text, sha) = self.fetch_text(path).await?;
        let file = parse_device_file(&text).map_err(|e| SourceError::parse(path, &e))?;
        Ok(FetchedCollection {
            file,
            token: ConcurrencyToken::new(sha),
        })
    }

    fn can_write(&self) -> bool {
        true
    }

    async fn publish(&self, request: &PublishRequest) -> Result<Published> {
        let tip = self.api.get_branch_tip(&self.base_branch).await?;
        let branch = branch_name(chrono::Utc::now().timestamp());
        self.api.create_branch(&branch, &tip).await?;

        for (path, change) in &request.changes {
            let update = FileUpdate {
                path,
                content: &change.content,
                sha: change.token.as_str(),
                branch: &branch,
                message: COMMIT_MESSAGE,
            };
            if let Err(err) = self.api.put_file(&update).await {
                tracing::warn!("Publish stopped at {} on branch {}: {}", path, branch, err);
                return Err(err);
            }
        }

        let url = self
            .api
            .create_pull_request(&NewPullRequest {
                title: &request.title,
                body: &request.body,
                head: &branch,
                base: &self.base_branch,
            })
            .await?;

        Ok(Published::PullRequest { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name() {
        assert_eq!(branch_name(1_700_000_000), "sparkctl-update-1700000000");
    }
}
