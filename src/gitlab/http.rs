//! HTTP utilities for GitLab REST API calls

use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying the personal access token on every request
const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pagination state carried in GitLab list response headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub total_pages: u32,
    /// Absent on the last page (GitLab sends an empty `x-next-page` header)
    pub next_page: Option<u32>,
}

impl PageInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            page: header_u32(headers, "x-page").unwrap_or(1),
            total_pages: header_u32(headers, "x-total-pages").unwrap_or(1),
            next_page: header_u32(headers, "x-next-page"),
        }
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// HTTP client wrapper for GitLab API calls
#[derive(Clone)]
pub struct GitLabHttpClient {
    client: Client,
}

impl GitLabHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("runsweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request and parse the JSON body
    pub async fn get(&self, url: &str, token: &str) -> Result<Value> {
        let (body, _) = self.get_paged(url, &[], token).await?;
        Ok(body)
    }

    /// Make a GET request with query parameters, returning the JSON body
    /// together with the pagination headers of the response
    pub async fn get_paged(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<(Value, PageInfo)> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .header(PRIVATE_TOKEN_HEADER, token)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let page_info = PageInfo::from_headers(response.headers());
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        let value = serde_json::from_str(&body).context("Failed to parse response JSON")?;
        Ok((value, page_info))
    }

    /// Make a DELETE request; GitLab answers 204 with an empty body on success
    pub async fn delete(&self, url: &str, token: &str) -> Result<()> {
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .header(PRIVATE_TOKEN_HEADER, token)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .context("Failed to read response body")?;
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn page_info_from_full_headers() {
        let map = headers(&[("x-page", "2"), ("x-total-pages", "7"), ("x-next-page", "3")]);
        assert_eq!(
            PageInfo::from_headers(&map),
            PageInfo {
                page: 2,
                total_pages: 7,
                next_page: Some(3),
            }
        );
    }

    #[test]
    fn page_info_last_page_has_empty_next() {
        let map = headers(&[("x-page", "7"), ("x-total-pages", "7"), ("x-next-page", "")]);
        let info = PageInfo::from_headers(&map);
        assert_eq!(info.next_page, None);
        assert_eq!(info.total_pages, 7);
    }

    #[test]
    fn page_info_defaults_without_headers() {
        let info = PageInfo::from_headers(&HeaderMap::new());
        assert_eq!(info, PageInfo { page: 1, total_pages: 1, next_page: None });
    }

    #[test]
    fn sanitize_truncates_and_strips() {
        let long = "x".repeat(300);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("[truncated, 300 bytes total]"));

        assert_eq!(sanitize_for_log("ok\u{7}\n body"), "ok body");
    }
}
