//! In-memory [`ContentApi`] for tests and offline runs.
//!
//! Files are kept per branch and hashed with SHA-256, so stale hashes are
//! detected the same way the hosted API detects them.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::api::{ContentApi, FileUpdate, NewPullRequest, RemoteFile};
use crate::error::{Result, SourceError};

/// A pull request recorded by [`MemoryContentApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub url: String,
}

#[derive(Debug, Default)]
struct Branch {
    commit: String,
    files: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct Store {
    branches: BTreeMap<String, Branch>,
    pull_requests: Vec<RecordedPullRequest>,
    commits: u64,
}

impl Store {
    fn next_commit(&mut self) -> String {
        self.commits += 1;
        format!("{:040x}", self.commits)
    }
}

/// Branch-aware content store held in memory.
#[derive(Debug)]
pub struct MemoryContentApi {
    store: Mutex<Store>,
}

/// Content hash used as the concurrency token.
pub fn content_sha(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

impl MemoryContentApi {
    /// Create a store with an empty `base` branch.
    pub fn new(base: &str) -> Self {
        let mut store = Store::default();
        let commit = store.next_commit();
        store.branches.insert(
            base.to_string(),
            Branch {
                commit,
                files: BTreeMap::new(),
            },
        );
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| SourceError::transport("memory store", "lock poisoned"))
    }

    /// Write a file directly, bypassing hash checks.
    pub fn set_file(&self, branch: &str, path: &str, content: &str) {
        if let Ok(mut store) = self.lock()
            && let Some(b) = store.branches.get_mut(branch)
        {
            b.files.insert(path.to_string(), content.to_string());
        }
    }

    /// Current content of a file on a branch.
    pub fn file(&self, branch: &str, path: &str) -> Option<String> {
        let store = self.lock().ok()?;
        store.branches.get(branch)?.files.get(path).cloned()
    }

    /// Names of all branches.
    pub fn branches(&self) -> Vec<String> {
        self.lock()
            .map(|store| store.branches.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Pull requests opened so far.
    pub fn pull_requests(&self) -> Vec<RecordedPullRequest> {
        self.lock()
            .map(|store| store.pull_requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentApi for MemoryContentApi {
    async fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFile> {
        let store = self.lock()?;
        let content = store
            .branches
            .get(branch)
            .and_then(|b| b.files.get(path))
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_string(),
            })?;
        Ok(RemoteFile {
            sha: content_sha(content),
            content: content.clone(),
        })
    }

    async fn get_branch_tip(&self, branch: &str) -> Result<String> {
        let store = self.lock()?;
        store
            .branches
            .get(branch)
            .map(|b| b.commit.clone())
            .ok_or_else(|| SourceError::NotFound {
                path: branch.to_string(),
            })
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()> {
        let mut store = self.lock()?;
        if store.branches.contains_key(branch) {
            return Err(SourceError::Conflict {
                path: branch.to_string(),
                reason: "Reference already exists".to_string(),
            });
        }
        let files = store
            .branches
            .values()
            .find(|b| b.commit == sha)
            .map(|b| b.files.clone())
            .ok_or_else(|| SourceError::NotFound {
                path: sha.to_string(),
            })?;
        store.branches.insert(
            branch.to_string(),
            Branch {
                commit: sha.to_string(),
                files,
            },
        );
        Ok(())
    }

    async fn put_file(&self, update: &FileUpdate<'_>) -> Result<()> {
        let mut store = self.lock()?;
        let commit = store.next_commit();
        let branch = store
            .branches
            .get_mut(update.branch)
            .ok_or_else(|| SourceError::NotFound {
                path: update.branch.to_string(),
            })?;

        let current = branch.files.get(update.path).map(|c| content_sha(c));
        if current.as_deref() != Some(update.sha) {
            return Err(SourceError::Conflict {
                path: update.path.to_string(),
                reason: format!("{} does not match {}", update.path, update.sha),
            });
        }

        branch
            .files
            .insert(update.path.to_string(), update.content.to_string());
        branch.commit = commit;
        Ok(())
    }

    async fn create_pull_request(&self, request: &NewPullRequest<'_>) -> Result<String> {
        let mut store = self.lock()?;
        if !store.branches.contains_key(request.head) {
            return Err(SourceError::NotFound {
                path: request.head.to_string(),
            });
        }
        let url = format!(
            "https://github.test/pull/{}",
            store.pull_requests.len() + 1
        );
        store.pull_requests.push(RecordedPullRequest {
            title: request.title.to_string(),
            body: request.body.to_string(),
            head: request.head.to_string(),
            base: request.base.to_string(),
            url: url.clone(),
        });
        Ok(url)
    }
}
