use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use feverkit_common::ArticleRecord;
use mediawiki_client::MediaWikiClient;
use ores_client::{OresClient, OresError};

/// Resolves one article title to a full output row. The seam between the
/// convergence loop and the remote services, so the loop can be exercised
/// with in-memory fakes.
#[async_trait]
pub trait ArticleResolver: Send + Sync {
    async fn resolve(&self, title: &str) -> Result<ArticleRecord>;
}

/// Live resolver: MediaWiki revision lookup followed by ORES scoring.
pub struct WikiResolver {
    wiki: MediaWikiClient,
    ores: OresClient,
    cutoff: DateTime<Utc>,
}

impl WikiResolver {
    pub fn new(wiki: MediaWikiClient, ores: OresClient, cutoff: DateTime<Utc>) -> Self {
        Self { wiki, ores, cutoff }
    }
}

#[async_trait]
impl ArticleResolver for WikiResolver {
    async fn resolve(&self, title: &str) -> Result<ArticleRecord> {
        let page = self
            .wiki
            .latest_revision(title, self.cutoff)
            .await
            .with_context(|| format!("Revision lookup failed for {title}"))?;

        let mut record = ArticleRecord {
            original_title: title.to_string(),
            redirected: page.redirected,
            page_id: Some(page.page_id),
            title: Some(page.title),
            revid: page.rev_id,
            timestamp: page.timestamp,
            ..ArticleRecord::default()
        };

        let Some(rev_id) = record.revid else {
            warn!(title, "No revision at or before cutoff, leaving scores empty");
            return Ok(record);
        };

        match self.ores.scores(rev_id).await {
            Ok(scores) => {
                record.damaging = Some(scores.damaging_true);
                record.goodfaith = Some(scores.goodfaith_true);
                record.wp10_prediction = Some(scores.wp10.prediction);
                record.wp10_probs = Some(scores.wp10.probabilities);
                record.draftquality_prediction = Some(scores.draftquality.prediction);
                record.draftquality_probs = Some(scores.draftquality.probabilities);
            }
            // A final answer from the service: this revision cannot be
            // scored. Keep the resolved revision fields; re-submitting the
            // title would not change anything.
            Err(OresError::ScoreUnavailable { model, message }) => {
                warn!(
                    title,
                    rev_id,
                    model = model.as_str(),
                    message = message.as_str(),
                    "Revision cannot be scored"
                );
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Score lookup failed for {title} (revid {rev_id})"));
            }
        }

        Ok(record)
    }
}
