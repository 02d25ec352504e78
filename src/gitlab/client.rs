//! GitLab client
//!
//! Combines the access token with the HTTP wrapper and knows how to build
//! API v4 URLs for a given instance.

use super::http::GitLabHttpClient;
use anyhow::{Context, Result};
use url::Url;

/// Main GitLab client
#[derive(Clone)]
pub struct GitLabClient {
    pub http: GitLabHttpClient,
    base_url: Url,
    token: String,
}

impl GitLabClient {
    /// Create a new client for the given instance
    pub fn new(host: &str, token: &str) -> Result<Self> {
        let base_url =
            Url::parse(host).with_context(|| format!("Invalid GitLab host URL: {host}"))?;
        let http = GitLabHttpClient::new()?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    /// The personal access token sent with every request
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Build an API v4 URL
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/v4/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// URL of the runners collection
    pub fn runners_url(&self) -> String {
        self.api_url("runners")
    }

    /// URL of a single runner
    pub fn runner_url(&self, id: u64) -> String {
        self.api_url(&format!("runners/{id}"))
    }
}
