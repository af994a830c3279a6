use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use mediawiki_client::MediaWikiClient;

/// Fetches ranked candidate page titles for one claim. The seam between the
/// convergence loop and the search API.
#[async_trait]
pub trait CandidateSearcher: Send + Sync {
    async fn candidates(&self, claim: &str) -> Result<Vec<String>>;

    /// One lookup without the per-request timeout, used by the fill pass for
    /// claims the bounded rounds never resolved.
    async fn candidates_unbounded(&self, claim: &str) -> Result<Vec<String>> {
        self.candidates(claim).await
    }
}

pub struct WikiSearcher {
    client: MediaWikiClient,
    limit: u32,
    timeout: Duration,
}

impl WikiSearcher {
    pub fn new(client: MediaWikiClient, limit: u32, timeout: Duration) -> Self {
        Self {
            client,
            limit,
            timeout,
        }
    }
}

#[async_trait]
impl CandidateSearcher for WikiSearcher {
    async fn candidates(&self, claim: &str) -> Result<Vec<String>> {
        let hits = tokio::time::timeout(self.timeout, self.client.search(claim, self.limit))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Search timed out after {}ms for claim: {claim}",
                    self.timeout.as_millis()
                )
            })?
            .with_context(|| format!("Search failed for claim: {claim}"))?;

        Ok(hits.into_iter().map(|hit| hit.title).collect())
    }

    async fn candidates_unbounded(&self, claim: &str) -> Result<Vec<String>> {
        let hits = self
            .client
            .search(claim, self.limit)
            .await
            .with_context(|| format!("Search failed for claim: {claim}"))?;

        Ok(hits.into_iter().map(|hit| hit.title).collect())
    }
}
