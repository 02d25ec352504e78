//! The sweep pipeline
//!
//! Three stages over the runner API: collect every offline runner
//! (paginated listing with a concurrent fan-out over secondary pages),
//! enrich each with its full record and apply the location filters, and
//! finally purge the survivors. Failures of individual pages, lookups and
//! deletes are logged and never stop their siblings; only a failure of the
//! first listing page aborts the run.

use crate::filter::LocationFilter;
use crate::gitlab::client::GitLabClient;
use crate::gitlab::runners::{self, Runner, RunnerDetails};
use anyhow::Result;
use futures::future::join_all;

pub struct Sweeper<'a> {
    client: &'a GitLabClient,
    filter: LocationFilter,
}

impl<'a> Sweeper<'a> {
    pub fn new(client: &'a GitLabClient, filter: LocationFilter) -> Self {
        Self { client, filter }
    }

    /// Fetch every page of offline runners.
    ///
    /// Page 1 is fetched up front to learn the page count, the remaining
    /// pages concurrently. A failed secondary page contributes zero items.
    pub async fn collect_offline_runners(&self) -> Result<Vec<Runner>> {
        let first = runners::list_offline_runners(self.client, 1).await?;
        let total_pages = first.page_info.total_pages;
        let mut all = first.runners;

        if total_pages > 1 {
            let fetches =
                (2..=total_pages).map(|page| runners::list_offline_runners(self.client, page));

            for (page, result) in (2..=total_pages).zip(join_all(fetches).await) {
                match result {
                    Ok(fetched) => all.extend(fetched.runners),
                    Err(err) => {
                        tracing::error!("Failed to list runners on page {page}: {err}");
                    }
                }
            }
        }

        tracing::debug!("Found {} offline runners", all.len());
        Ok(all)
    }

    /// Fetch the full record for each runner and drop the ones the location
    /// filters reject. A failed lookup skips only that runner.
    pub async fn stale_runner_details(&self, found: &[Runner]) -> Vec<RunnerDetails> {
        let fetches = found
            .iter()
            .map(|runner| runners::runner_details(self.client, runner.id));
        let results = join_all(fetches).await;

        let mut stale = Vec::with_capacity(found.len());
        for (runner, result) in found.iter().zip(results) {
            match result {
                Ok(details) => {
                    if self.filter.permits(&details.locations()) {
                        stale.push(details);
                    } else {
                        tracing::info!("Skipping runner {}", details.id);
                    }
                }
                Err(err) => {
                    tracing::error!("Error {err} getting runner details for runner ID {}", runner.id);
                }
            }
        }
        stale
    }

    /// Delete every approved runner concurrently. Failures are logged, not
    /// propagated; an empty list is reported and left alone.
    pub async fn cleanup_runners(&self, stale: &[RunnerDetails]) {
        if stale.is_empty() {
            tracing::info!("No runners to be purged!");
            return;
        }

        let deletes = stale.iter().map(|details| async move {
            tracing::info!(
                "Deleting {} - {}",
                details.id,
                details.name.as_deref().unwrap_or("")
            );
            (details.id, runners::delete_runner(self.client, details.id).await)
        });

        for (id, result) in join_all(deletes).await {
            if let Err(err) = result {
                tracing::error!("Failed to delete runner {id}: {err}");
            }
        }
    }
}
