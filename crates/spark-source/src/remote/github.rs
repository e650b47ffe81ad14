//! GitHub REST client implementing [`ContentApi`].

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use super::api::{ContentApi, FileUpdate, NewPullRequest, RemoteFile};
use super::types::{
    ApiErrorBody, BranchResponse, ContentResponse, CreatePullRequest, CreateRefRequest,
    PullRequestResponse, PutContentRequest,
};
use crate::error::{Result, SourceError};

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("sparkctl/", env!("CARGO_PKG_VERSION"));

/// What a request does to the repository.
///
/// Only content updates carry a blob hash, so only they can report a
/// concurrent edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Create,
    Update,
}

/// GitHub API client scoped to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Creates a client for `owner/repo` authenticated with `token`.
    ///
    /// # Arguments
    /// * `api_url` - API base URL, usually [`DEFAULT_API_URL`]
    /// * `owner` - Repository owner (e.g., "hardwario")
    /// * `repo` - Repository name
    /// * `token` - Personal access or `gh` token
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: &str,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| SourceError::Auth("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::transport("failed to create HTTP client", e))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    fn repo_url(&self, rest: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.owner, self.repo, rest
        )
    }

    /// Turns a non-success response into a [`SourceError`].
    async fn check(
        &self,
        response: reqwest::Response,
        target: &str,
        access: Access,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate_limited = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|remaining| remaining.to_str().unwrap_or("1") == "0");

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_default();

        Err(map_status(status, rate_limited, target, access, &message))
    }
}

/// Status-code mapping for failed API calls.
fn map_status(
    status: StatusCode,
    rate_limited: bool,
    target: &str,
    access: Access,
    message: &str,
) -> SourceError {
    let reason = if message.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {message}")
    };

    match status {
        StatusCode::UNAUTHORIZED => SourceError::Auth(reason),
        StatusCode::FORBIDDEN if rate_limited => {
            SourceError::transport("GitHub API rate limit exceeded", reason)
        }
        StatusCode::FORBIDDEN => SourceError::Auth(reason),
        StatusCode::NOT_FOUND => SourceError::NotFound {
            path: target.to_string(),
        },
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY if access == Access::Update => {
            SourceError::Conflict {
                path: target.to_string(),
                reason,
            }
        }
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY if access == Access::Create => {
            SourceError::transport(format!("could not create {target}"), reason)
        }
        _ => SourceError::transport(format!("GitHub request for {target} failed"), reason),
    }
}

fn decode_content(path: &str, encoded: &str) -> Result<String> {
    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(cleaned).map_err(|e| SourceError::Parse {
        path: path.to_string(),
        reason: format!("invalid base64 content: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| SourceError::Parse {
        path: path.to_string(),
        reason: format!("content is not UTF-8: {e}"),
    })
}

#[async_trait]
impl ContentApi for GitHubClient {
    async fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFile> {
        let url = self.repo_url(&format!("contents/{path}?ref={branch}"));
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = self.check(response, path, Access::Read).await?;
        let body: ContentResponse = response.json().await?;

        if !body.encoding.is_empty() && body.encoding != "base64" {
            return Err(SourceError::Parse {
                path: body.path,
                reason: format!("unsupported encoding '{}'", body.encoding),
            });
        }

        Ok(RemoteFile {
            content: decode_content(path, &body.content)?,
            sha: body.sha,
        })
    }

    async fn get_branch_tip(&self, branch: &str) -> Result<String> {
        let url = self.repo_url(&format!("branches/{branch}"));
        tracing::debug!("Resolving branch tip from {}", url);

        let response = self.client.get(&url).send().await?;
        let response = self.check(response, branch, Access::Read).await?;
        let body: BranchResponse = response.json().await?;
        Ok(body.commit.sha)
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()> {
        let url = self.repo_url("git/refs");
        let request = CreateRefRequest {
            reference: format!("refs/heads/{branch}"),
            sha,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        self.check(response, branch, Access::Create).await?;
        tracing::info!("Created branch {} at {}", branch, sha);
        Ok(())
    }

    async fn put_file(&self, update: &FileUpdate<'_>) -> Result<()> {
        let url = self.repo_url(&format!("contents/{}", update.path));
        let request = PutContentRequest {
            message: update.message,
            content: BASE64.encode(update.content.as_bytes()),
            sha: update.sha,
            branch: update.branch,
        };

        let response = self.client.put(&url).json(&request).send().await?;
        self.check(response, update.path, Access::Update).await?;
        tracing::info!("Updated {} on {}", update.path, update.branch);
        Ok(())
    }

    async fn create_pull_request(&self, request: &NewPullRequest<'_>) -> Result<String> {
        let url = self.repo_url("pulls");
        let body = CreatePullRequest {
            title: request.title,
            body: request.body,
            head: request.head,
            base: request.base,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let response = self.check(response, request.head, Access::Create).await?;
        let pr: PullRequestResponse = response.json().await?;
        tracing::info!("Opened pull request #{} at {}", pr.number, pr.html_url);
        Ok(pr.html_url)
    }
}
