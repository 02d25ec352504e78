//! GitLab runners
//!
//! Models for the runner endpoints plus the three calls the sweep needs:
//! list one page of offline runners, fetch a runner's full record, and
//! delete a runner registration.

use super::client::GitLabClient;
use super::http::PageInfo;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Runners are listed 100 at a time, the API maximum
pub const PER_PAGE: u32 = 100;

/// Status filter for the listing; offline runners are the stale ones
const STALE_STATUS: &str = "offline";

/// Listing summary returned by `GET /runners`
#[derive(Debug, Clone, Deserialize)]
pub struct Runner {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub runner_type: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub status: Option<String>,
}

/// Full runner record returned by `GET /runners/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerDetails {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub runner_type: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub contacted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub groups: Vec<RunnerGroup>,
    #[serde(default)]
    pub projects: Vec<RunnerProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerGroup {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerProject {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: Option<String>,
}

/// A group or project scope a runner is registered to; filter input only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: u64,
    pub name: String,
}

impl RunnerDetails {
    /// Groups and projects flattened into one location list
    pub fn locations(&self) -> Vec<Location> {
        let mut locations: Vec<Location> = self
            .groups
            .iter()
            .map(|group| Location {
                id: group.id,
                name: group.name.clone(),
            })
            .collect();
        locations.extend(self.projects.iter().map(|project| Location {
            id: project.id,
            name: project.name.clone(),
        }));
        locations
    }
}

/// One page of the offline runner listing
#[derive(Debug)]
pub struct RunnerPage {
    pub runners: Vec<Runner>,
    pub page_info: PageInfo,
}

/// Fetch one page of offline runners
pub async fn list_offline_runners(client: &GitLabClient, page: u32) -> Result<RunnerPage> {
    let query = [
        ("status", STALE_STATUS.to_string()),
        ("per_page", PER_PAGE.to_string()),
        ("page", page.to_string()),
    ];

    let (body, page_info) = client
        .http
        .get_paged(&client.runners_url(), &query, client.token())
        .await?;

    let runners =
        serde_json::from_value(body).context("Failed to parse runner list response")?;

    Ok(RunnerPage { runners, page_info })
}

/// Fetch the full record for a single runner
pub async fn runner_details(client: &GitLabClient, id: u64) -> Result<RunnerDetails> {
    let body = client.http.get(&client.runner_url(id), client.token()).await?;
    serde_json::from_value(body)
        .with_context(|| format!("Failed to parse details of runner {id}"))
}

/// Remove a runner registration
pub async fn delete_runner(client: &GitLabClient, id: u64) -> Result<()> {
    client
        .http
        .delete(&client.runner_url(id), client.token())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn details_deserialize_from_api_shape() {
        let body = json!({
            "id": 6,
            "description": "shared-runner-1",
            "ip_address": "127.0.0.1",
            "active": true,
            "is_shared": false,
            "runner_type": "group_type",
            "online": false,
            "status": "offline",
            "contacted_at": "2024-11-05T08:01:30.000Z",
            "groups": [
                {"id": 11, "name": "infra", "web_url": "https://gitlab.example.com/groups/infra"}
            ],
            "projects": [
                {"id": 21, "name": "deploy", "path_with_namespace": "infra/deploy"}
            ]
        });

        let details: RunnerDetails = serde_json::from_value(body).unwrap();
        assert_eq!(details.id, 6);
        assert_eq!(details.runner_type, "group_type");
        assert!(!details.online);
        assert!(details.contacted_at.is_some());
        assert_eq!(details.groups[0].name, "infra");
        assert_eq!(details.projects[0].name, "deploy");
    }

    #[test]
    fn locations_flatten_groups_then_projects() {
        let details: RunnerDetails = serde_json::from_value(json!({
            "id": 1,
            "groups": [{"id": 11, "name": "infra"}],
            "projects": [{"id": 21, "name": "deploy"}, {"id": 22, "name": "web"}]
        }))
        .unwrap();

        let locations = details.locations();
        assert_eq!(
            locations,
            vec![
                Location { id: 11, name: "infra".into() },
                Location { id: 21, name: "deploy".into() },
                Location { id: 22, name: "web".into() },
            ]
        );
    }

    #[test]
    fn summary_tolerates_minimal_payload() {
        let runner: Runner = serde_json::from_value(json!({"id": 99})).unwrap();
        assert_eq!(runner.id, 99);
        assert_eq!(runner.description, "");
        assert!(!runner.online);
    }
}
