use std::collections::{BTreeMap, HashSet};
use std::future::Future;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::info;

use crate::progress;

/// What a run of [`converge`] produced: the resolved table keyed by work
/// item, the items still unresolved when the ceiling was hit, and how many
/// rounds ran.
pub struct ConvergeOutcome<R> {
    pub table: BTreeMap<String, R>,
    pub unresolved: Vec<String>,
    pub rounds: u32,
}

/// Drive fan-out rounds until every item resolves or the retry ceiling is
/// reached.
///
/// Each round submits exactly the items unresolved from the previous round
/// through a bounded worker pool. `fetch` is called once per pending item per
/// round and always produces a record; `resolved` decides whether that record
/// leaves the convergence set. `snapshot` persists the accumulated table
/// after every round.
///
/// `items` is expected to be free of duplicates; callers dedup first so
/// result rows can be matched back by identity.
pub async fn converge<R, Fetch, Fut, Resolved, Snapshot>(
    items: &[String],
    ceiling: u32,
    pool_size: usize,
    label: &str,
    fetch: Fetch,
    resolved: Resolved,
    mut snapshot: Snapshot,
) -> Result<ConvergeOutcome<R>>
where
    Fetch: Fn(String) -> Fut,
    Fut: Future<Output = (String, R)>,
    Resolved: Fn(&R) -> bool,
    Snapshot: FnMut(&BTreeMap<String, R>) -> Result<()>,
{
    let pool_size = pool_size.max(1);
    let mut table: BTreeMap<String, R> = BTreeMap::new();
    let mut missing: Vec<String> = items.to_vec();
    let mut rounds = 0;

    while !missing.is_empty() && rounds < ceiling {
        rounds += 1;
        info!(round = rounds, pending = missing.len(), "Starting round");

        let bar = progress::round_bar(missing.len(), label);
        let results: Vec<(String, R)> = stream::iter(missing.iter().cloned().map(|item| {
            let request = fetch(item);
            let bar = bar.clone();
            async move {
                let result = request.await;
                bar.inc(1);
                result
            }
        }))
        .buffer_unordered(pool_size)
        .collect()
        .await;
        bar.finish_and_clear();

        for (item, record) in results {
            if resolved(&record) {
                table.insert(item, record);
            }
        }

        // Convergence set: input items minus resolved, in input order.
        missing.retain(|item| !table.contains_key(item));

        snapshot(&table)?;

        info!(
            round = rounds,
            resolved = table.len(),
            remaining = missing.len(),
            "Round complete"
        );
    }

    Ok(ConvergeOutcome {
        table,
        unresolved: missing,
        rounds,
    })
}

/// Collapse duplicate work items, keeping first-occurrence order.
pub fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}
