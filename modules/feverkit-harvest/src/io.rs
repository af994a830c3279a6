use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Read the article work list: a JSON array of title strings.
pub fn read_titles(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let titles: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of titles", path.display()))?;
    Ok(titles)
}

#[derive(Debug, Deserialize)]
struct ClaimRow {
    claim: String,
    /// Corpus label; rows not marked VERIFIABLE carry no evidence and are
    /// skipped. Files without the column keep every row.
    #[serde(default)]
    verifiable: Option<String>,
}

/// Read claim texts from the corpus CSV.
pub fn read_claims(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut claims = Vec::new();
    for row in reader.deserialize() {
        let row: ClaimRow =
            row.with_context(|| format!("Malformed row in {}", path.display()))?;
        match row.verifiable.as_deref() {
            Some("VERIFIABLE") | None => claims.push(row.claim),
            Some(_) => {}
        }
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn titles_load_from_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        fs::write(&path, r#"["Albert Einstein", "Telemundo", "Fox Broadcasting Company"]"#)
            .unwrap();

        let titles = read_titles(&path).unwrap();
        assert_eq!(titles.len(), 3);
        assert_eq!(titles[0], "Albert Einstein");
    }

    #[test]
    fn titles_reject_non_array_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        fs::write(&path, r#"{"titles": []}"#).unwrap();

        assert!(read_titles(&path).is_err());
    }

    #[test]
    fn claims_keep_only_verifiable_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "id,verifiable,claim").unwrap();
        writeln!(file, "1,VERIFIABLE,Colin Kaepernick became a starter.").unwrap();
        writeln!(file, "2,NOT VERIFIABLE,Some unsupported claim.").unwrap();
        writeln!(file, "3,VERIFIABLE,Telemundo is an English-language network.").unwrap();
        drop(file);

        let claims = read_claims(&path).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0], "Colin Kaepernick became a starter.");
    }

    #[test]
    fn claims_without_verifiable_column_all_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "claim").unwrap();
        writeln!(file, "First claim.").unwrap();
        writeln!(file, "Second claim.").unwrap();
        drop(file);

        let claims = read_claims(&path).unwrap();
        assert_eq!(claims.len(), 2);
    }
}
