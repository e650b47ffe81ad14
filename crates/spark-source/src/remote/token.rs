//! GitHub token discovery.

use crate::error::{Result, SourceError};

/// Environment variables checked for a token, in order.
pub const TOKEN_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

/// First non-empty token among [`TOKEN_VARS`].
pub fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Find a GitHub token from the environment or the `gh` CLI.
pub async fn resolve_token() -> Result<String> {
    if let Some(token) = token_from_env(|var| std::env::var(var).ok()) {
        tracing::debug!("Using GitHub token from environment");
        return Ok(token);
    }

    match tokio::process::Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !token.is_empty() {
                tracing::debug!("Using GitHub token from gh CLI");
                return Ok(token);
            }
        }
        Ok(output) => {
            tracing::debug!(
                "gh auth token exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Err(err) => tracing::debug!("gh CLI not available: {}", err),
    }

    Err(SourceError::Auth(
        "no GitHub token found (GH_TOKEN, GITHUB_TOKEN or 'gh auth login')".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_precedence() {
        let env = |var: &str| match var {
            "GH_TOKEN" => Some("first".to_string()),
            "GITHUB_TOKEN" => Some("second".to_string()),
            _ => None,
        };
        assert_eq!(token_from_env(env).as_deref(), Some("first"));
    }

    #[test]
    fn test_blank_token_skipped() {
        let env = |var: &str| match var {
            "GH_TOKEN" => Some("  ".to_string()),
            "GITHUB_TOKEN" => Some("second".to_string()),
            _ => None,
        };
        assert_eq!(token_from_env(env).as_deref(), Some("second"));
        assert_eq!(token_from_env(|_| None), None);
    }
}
