pub mod error;
pub mod types;

pub use error::{MediaWikiError, Result};
pub use types::{Page, QueryBody, QueryResponse, Redirect, Revision, RevisionPage, SearchHit};

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

pub struct MediaWikiClient {
    client: reqwest::Client,
    base_url: String,
}

impl MediaWikiClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Latest revision of `title` at or before `cutoff`, following redirects.
    ///
    /// A page that exists but has no revision before the cutoff comes back
    /// with `rev_id`/`timestamp` unset.
    pub async fn latest_revision(
        &self,
        title: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<RevisionPage> {
        debug!(title, "Revision lookup");

        let rvstart = cutoff.to_rfc3339_opts(SecondsFormat::Secs, true);
        let resp = self
            .client
            .get(self.endpoint())
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "revisions"),
                ("titles", title),
                ("rvprop", "ids|timestamp"),
                ("rvlimit", "1"),
                ("rvdir", "older"),
                ("rvstart", rvstart.as_str()),
                ("redirects", "1"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MediaWikiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let body: QueryResponse = serde_json::from_str(&text)?;
        extract_revision_page(body, title)
    }

    /// Fulltext search. Returns up to `limit` hits, best match first.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>> {
        debug!(query, limit, "Search");

        let limit = limit.to_string();
        let resp = self
            .client
            .get(self.endpoint())
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MediaWikiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let body: QueryResponse = serde_json::from_str(&text)?;
        Ok(body.query.map(|q| q.search).unwrap_or_default())
    }

    fn endpoint(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }
}

/// Pull the single-page revision shape out of a query response.
fn extract_revision_page(body: QueryResponse, title: &str) -> Result<RevisionPage> {
    let query = body
        .query
        .ok_or_else(|| MediaWikiError::Parse("response has no query body".to_string()))?;

    let redirected = !query.redirects.is_empty();

    let page = query
        .pages
        .into_iter()
        .next()
        .ok_or_else(|| MediaWikiError::Parse("response has no pages".to_string()))?;

    if page.missing || page.invalid {
        return Err(MediaWikiError::PageMissing(title.to_string()));
    }

    let page_id = page
        .page_id
        .ok_or_else(|| MediaWikiError::Parse(format!("page {title} has no pageid")))?;

    let revision = page.revisions.into_iter().next();

    Ok(RevisionPage {
        page_id,
        title: page.title,
        rev_id: revision.as_ref().map(|r| r.rev_id),
        timestamp: revision.map(|r| r.timestamp),
        redirected,
    })
}
