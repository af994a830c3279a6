use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::SecondsFormat;

use feverkit_common::{ArticleRecord, ClaimRecord};

const ARTICLE_HEADER: [&str; 12] = [
    "original_title",
    "redirected",
    "page_id",
    "title",
    "revid",
    "timestamp",
    "damaging",
    "goodfaith",
    "wp10_prediction",
    "wp10_probs",
    "draftquality_prediction",
    "draftquality_probs",
];

const CLAIM_HEADER: [&str; 2] = ["claim", "candidates"];

/// Write the article table. Probability maps are JSON-encoded so each row
/// stays flat; unresolved fields are empty. The file is rewritten whole on
/// every call, which keeps each round's snapshot self-contained.
pub fn write_articles<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a ArticleRecord>,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    writer.write_record(ARTICLE_HEADER)?;

    for record in records {
        writer.write_record([
            record.original_title.clone(),
            record.redirected.to_string(),
            opt(&record.page_id),
            opt(&record.title),
            opt(&record.revid),
            record
                .timestamp
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            opt(&record.damaging),
            opt(&record.goodfaith),
            opt(&record.wp10_prediction),
            json_opt(&record.wp10_probs)?,
            opt(&record.draftquality_prediction),
            json_opt(&record.draftquality_probs)?,
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Write the claim table. The candidate list is JSON-encoded in one column;
/// an unresolved claim gets an empty list, never a dropped row.
pub fn write_claims<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a ClaimRecord>,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    writer.write_record(CLAIM_HEADER)?;

    for record in records {
        writer.write_record([
            record.claim.clone(),
            serde_json::to_string(&record.candidates)?,
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

fn json_opt(value: &Option<BTreeMap<String, f64>>) -> Result<String> {
    Ok(match value {
        Some(map) => serde_json::to_string(map)?,
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn resolved_record() -> ArticleRecord {
        ArticleRecord {
            original_title: "Einstein".to_string(),
            redirected: true,
            page_id: Some(736),
            title: Some("Albert Einstein".to_string()),
            revid: Some(787926574),
            timestamp: Some(Utc.with_ymd_and_hms(2017, 6, 28, 14, 0, 9).unwrap()),
            damaging: Some(0.028),
            goodfaith: Some(0.991),
            wp10_prediction: Some("FA".to_string()),
            wp10_probs: Some(BTreeMap::from([("FA".to_string(), 0.82)])),
            draftquality_prediction: Some("OK".to_string()),
            draftquality_probs: Some(BTreeMap::from([("OK".to_string(), 0.98)])),
        }
    }

    #[test]
    fn article_snapshot_round_trips_resolved_and_unresolved_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");

        let records = vec![resolved_record(), ArticleRecord::unresolved("Ghost Page")];
        write_articles(&path, records.iter()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("original_title,redirected,page_id"));
        assert!(lines[1].contains("Albert Einstein"));
        assert!(lines[1].contains("2017-06-28T14:00:09Z"));
        assert!(lines[1].contains(r#"""FA"":0.82"#));
        assert!(lines[2].starts_with("Ghost Page,false,,,"));
    }

    #[test]
    fn claim_snapshot_keeps_one_row_per_claim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.csv");

        let records = vec![
            ClaimRecord {
                claim: "Colin Kaepernick became a starter.".to_string(),
                candidates: vec![
                    "Colin Kaepernick".to_string(),
                    "2011 NFL season".to_string(),
                ],
            },
            ClaimRecord::empty("A claim nothing matched."),
        ];
        write_claims(&path, records.iter()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Colin Kaepernick"));
        assert!(lines[2].ends_with("[]"));
    }
}
