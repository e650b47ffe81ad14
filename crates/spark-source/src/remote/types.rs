//! GitHub REST API payloads.

use serde::{Deserialize, Serialize};

/// Response of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResponse {
    pub path: String,
    pub sha: String,

    /// Base64 payload, wrapped at 60 columns.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub encoding: String,
}

/// Response of `GET /repos/{owner}/{repo}/branches/{branch}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchResponse {
    pub name: String,
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// Body of `POST /repos/{owner}/{repo}/git/refs`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: &'a str,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize)]
pub struct PutContentRequest<'a> {
    pub message: &'a str,
    pub content: String,
    pub sha: &'a str,
    pub branch: &'a str,
}

/// Body of `POST /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

/// Response of `POST /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestResponse {
    pub number: u64,
    pub html_url: String,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
