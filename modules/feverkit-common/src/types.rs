use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// One output row for an article work item. Resolution fields fill in as the
/// pipeline resolves the title; a missing `title` marks the row unresolved
/// and keeps the item in the convergence set.
#[derive(Debug, Clone, Default)]
pub struct ArticleRecord {
    /// The work item as it appeared in the input, used to match results back.
    pub original_title: String,
    pub redirected: bool,
    pub page_id: Option<u64>,
    /// Canonical title after redirect resolution.
    pub title: Option<String>,
    pub revid: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub damaging: Option<f64>,
    pub goodfaith: Option<f64>,
    pub wp10_prediction: Option<String>,
    pub wp10_probs: Option<BTreeMap<String, f64>>,
    pub draftquality_prediction: Option<String>,
    pub draftquality_probs: Option<BTreeMap<String, f64>>,
}

impl ArticleRecord {
    /// A row with only the work-item identity filled in.
    pub fn unresolved(original_title: &str) -> Self {
        Self {
            original_title: original_title.to_string(),
            ..Self::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.title.is_some()
    }
}

/// One output row for a claim work item: the claim plus ranked candidate
/// page titles from search. An empty candidate list keeps the claim in the
/// convergence set.
#[derive(Debug, Clone)]
pub struct ClaimRecord {
    pub claim: String,
    pub candidates: Vec<String>,
}

impl ClaimRecord {
    pub fn empty(claim: &str) -> Self {
        Self {
            claim: claim.to_string(),
            candidates: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_record_has_no_title() {
        let record = ArticleRecord::unresolved("Albert Einstein");
        assert_eq!(record.original_title, "Albert Einstein");
        assert!(!record.is_resolved());
        assert!(record.revid.is_none());
    }

    #[test]
    fn claim_with_candidates_is_resolved() {
        let mut record = ClaimRecord::empty("Colin Kaepernick became a starter.");
        assert!(!record.is_resolved());

        record.candidates.push("Colin Kaepernick".to_string());
        assert!(record.is_resolved());
    }
}
