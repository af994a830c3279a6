use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use feverkit_common::{ArticleRecord, ClaimRecord};

use crate::resolver::ArticleResolver;
use crate::rounds::{converge, dedup_preserving_order};
use crate::searcher::CandidateSearcher;
use crate::snapshot;

/// Totals for one harvest run.
#[derive(Debug, Default)]
pub struct HarvestStats {
    pub items: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub rounds: u32,
}

impl std::fmt::Display for HarvestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Harvest Complete ===")?;
        writeln!(f, "Work items: {}", self.items)?;
        writeln!(f, "Resolved:   {}", self.resolved)?;
        writeln!(f, "Unresolved: {}", self.unresolved)?;
        write!(f, "Rounds run: {}", self.rounds)
    }
}

/// Resolve article titles to canonical revisions and quality scores,
/// retrying unresolved titles round by round. Intermediate snapshots hold
/// only resolved rows; the final write has one row per input title, with
/// empty fields where nothing resolved within the ceiling.
pub async fn harvest_articles(
    resolver: &dyn ArticleResolver,
    titles: &[String],
    ceiling: u32,
    pool_size: usize,
    output: &Path,
) -> Result<HarvestStats> {
    let unique = dedup_preserving_order(titles);

    let outcome = converge(
        &unique,
        ceiling,
        pool_size,
        "Resolving articles",
        |title| async move {
            let record = match resolver.resolve(&title).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(title = title.as_str(), error = %e, "Resolution failed");
                    ArticleRecord::unresolved(&title)
                }
            };
            (title, record)
        },
        |record: &ArticleRecord| record.is_resolved(),
        |table| snapshot::write_articles(output, table.values()),
    )
    .await?;

    let rows: Vec<ArticleRecord> = titles
        .iter()
        .map(|title| {
            outcome
                .table
                .get(title)
                .cloned()
                .unwrap_or_else(|| ArticleRecord::unresolved(title))
        })
        .collect();
    snapshot::write_articles(output, rows.iter())?;

    let resolved = rows.iter().filter(|row| row.is_resolved()).count();
    Ok(HarvestStats {
        items: rows.len(),
        resolved,
        unresolved: rows.len() - resolved,
        rounds: outcome.rounds,
    })
}

/// Fetch search candidates for claims, retrying claims whose lookup errored
/// or came back empty. With `fill_missing`, claims still empty after the
/// rounds get one sequential lookup without the per-request timeout. The
/// output always has one row per input claim.
pub async fn harvest_candidates(
    searcher: &dyn CandidateSearcher,
    claims: &[String],
    ceiling: u32,
    pool_size: usize,
    fill_missing: bool,
    output: &Path,
) -> Result<HarvestStats> {
    let unique = dedup_preserving_order(claims);

    let outcome = converge(
        &unique,
        ceiling,
        pool_size,
        "Fetching candidates",
        |claim| async move {
            let record = match searcher.candidates(&claim).await {
                Ok(candidates) if !candidates.is_empty() => ClaimRecord {
                    claim: claim.clone(),
                    candidates,
                },
                Ok(_) => {
                    debug!(claim = claim.as_str(), "Search returned no candidates");
                    ClaimRecord::empty(&claim)
                }
                Err(e) => {
                    warn!(claim = claim.as_str(), error = %e, "Search failed");
                    ClaimRecord::empty(&claim)
                }
            };
            (claim, record)
        },
        |record: &ClaimRecord| record.is_resolved(),
        |table| snapshot::write_claims(output, table.values()),
    )
    .await?;

    let mut table = outcome.table;
    if fill_missing && !outcome.unresolved.is_empty() {
        info!(
            pending = outcome.unresolved.len(),
            "Fill pass: sequential lookups without timeout"
        );
        for claim in &outcome.unresolved {
            match searcher.candidates_unbounded(claim).await {
                Ok(candidates) if !candidates.is_empty() => {
                    table.insert(
                        claim.clone(),
                        ClaimRecord {
                            claim: claim.clone(),
                            candidates,
                        },
                    );
                }
                Ok(_) => debug!(claim = claim.as_str(), "Still no candidates"),
                Err(e) => warn!(claim = claim.as_str(), error = %e, "Fill lookup failed"),
            }
        }
    }

    let rows: Vec<ClaimRecord> = claims
        .iter()
        .map(|claim| {
            table
                .get(claim)
                .cloned()
                .unwrap_or_else(|| ClaimRecord::empty(claim))
        })
        .collect();
    snapshot::write_claims(output, rows.iter())?;

    let resolved = rows.iter().filter(|row| row.is_resolved()).count();
    Ok(HarvestStats {
        items: rows.len(),
        resolved,
        unresolved: rows.len() - resolved,
        rounds: outcome.rounds,
    })
}
