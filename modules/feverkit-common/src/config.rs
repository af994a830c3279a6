use std::env;

use chrono::{DateTime, Utc};

/// The corpus snapshot is dated June 2017; revisions are taken at or before
/// this instant (1 July 2017, America/Los_Angeles).
pub const DEFAULT_CUTOFF_UNIX: i64 = 1_498_856_400;

pub const DEFAULT_MEDIAWIKI_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_ORES_URL: &str = "https://ores.wikimedia.org";
pub const DEFAULT_ORES_CONTEXT: &str = "enwiki";
pub const DEFAULT_USER_AGENT: &str =
    "feverkit-harvest/0.1 (claim-verification corpus enrichment)";

/// Harvester configuration loaded from environment variables. Every knob has
/// a default tuned for the public Wikimedia endpoints; CLI flags may override
/// individual fields after loading.
#[derive(Debug, Clone)]
pub struct Config {
    // Remote services
    pub mediawiki_url: String,
    pub ores_url: String,
    pub ores_context: String,
    pub user_agent: String,

    // Fan-out
    pub pool_size: usize,
    pub article_retry_ceiling: u32,
    pub claim_retry_ceiling: u32,

    // Search
    pub search_limit: u32,
    pub search_timeout_ms: u64,

    // Revision resolution
    pub cutoff: DateTime<Utc>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if a variable is present but malformed.
    pub fn from_env() -> Self {
        Self {
            mediawiki_url: env_or("MEDIAWIKI_URL", DEFAULT_MEDIAWIKI_URL),
            ores_url: env_or("ORES_URL", DEFAULT_ORES_URL),
            ores_context: env_or("ORES_CONTEXT", DEFAULT_ORES_CONTEXT),
            user_agent: env_or("HARVEST_USER_AGENT", DEFAULT_USER_AGENT),
            pool_size: env_or("HARVEST_POOL_SIZE", "10")
                .parse()
                .expect("HARVEST_POOL_SIZE must be a number"),
            article_retry_ceiling: env_or("HARVEST_ARTICLE_RETRIES", "7")
                .parse()
                .expect("HARVEST_ARTICLE_RETRIES must be a number"),
            claim_retry_ceiling: env_or("HARVEST_CLAIM_RETRIES", "5")
                .parse()
                .expect("HARVEST_CLAIM_RETRIES must be a number"),
            search_limit: env_or("HARVEST_SEARCH_LIMIT", "10")
                .parse()
                .expect("HARVEST_SEARCH_LIMIT must be a number"),
            search_timeout_ms: env_or("HARVEST_SEARCH_TIMEOUT_MS", "1000")
                .parse()
                .expect("HARVEST_SEARCH_TIMEOUT_MS must be a number"),
            cutoff: match env::var("HARVEST_CUTOFF") {
                Ok(raw) => DateTime::parse_from_rfc3339(&raw)
                    .expect("HARVEST_CUTOFF must be an RFC 3339 timestamp")
                    .with_timezone(&Utc),
                Err(_) => default_cutoff(),
            },
        }
    }
}

pub fn default_cutoff() -> DateTime<Utc> {
    DateTime::from_timestamp(DEFAULT_CUTOFF_UNIX, 0).expect("valid cutoff timestamp")
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
