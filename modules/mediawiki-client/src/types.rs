use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Top-level envelope for `action=query` responses (formatversion=2).
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub query: Option<QueryBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryBody {
    /// Present when the request followed one or more redirects.
    #[serde(default)]
    pub redirects: Vec<Redirect>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(rename = "pageid")]
    pub page_id: Option<u64>,
    pub title: String,
    /// Set when the title does not exist on the wiki.
    #[serde(default)]
    pub missing: bool,
    /// Set when the title is malformed and cannot name a page.
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Revision {
    #[serde(rename = "revid")]
    pub rev_id: u64,
    pub timestamp: DateTime<Utc>,
}

/// One ranked hit from `list=search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "pageid")]
    pub page_id: u64,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    pub size: Option<u64>,
    pub wordcount: Option<u64>,
}

/// Latest revision of a page at or before a cutoff, after redirect resolution.
#[derive(Debug, Clone)]
pub struct RevisionPage {
    pub page_id: u64,
    pub title: String,
    /// Absent when the page exists but has no revision before the cutoff.
    pub rev_id: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub redirected: bool,
}
