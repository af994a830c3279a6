use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use feverkit_common::Config;
use feverkit_harvest::{harvest, io, resolver::WikiResolver, searcher::WikiSearcher};
use mediawiki_client::MediaWikiClient;
use ores_client::OresClient;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Claim-verification corpus enrichment harvester")]
#[command(version)]
struct Cli {
    /// Worker pool size for fan-out requests
    #[arg(long, global = true)]
    pool_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve article titles to canonical revisions and quality scores
    Articles {
        /// JSON array of article titles
        #[arg(long)]
        input: PathBuf,

        /// Output CSV, rewritten as a snapshot after every round
        #[arg(long)]
        output: PathBuf,

        /// Latest acceptable revision timestamp (RFC 3339)
        #[arg(long, value_parser = parse_cutoff)]
        cutoff: Option<DateTime<Utc>>,

        /// Retry ceiling for unresolved titles
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Fetch search candidate pages for claim texts
    Candidates {
        /// Corpus CSV with claim and verifiable columns
        #[arg(long)]
        input: PathBuf,

        /// Output CSV, rewritten as a snapshot after every round
        #[arg(long)]
        output: PathBuf,

        /// Retry ceiling for claims with no candidates
        #[arg(long)]
        retries: Option<u32>,

        /// After the retry rounds, make one sequential lookup without the
        /// per-request timeout for each claim still missing candidates
        #[arg(long)]
        fill_missing: bool,
    },
}

fn parse_cutoff(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("not an RFC 3339 timestamp: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("feverkit_harvest=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(pool_size) = cli.pool_size {
        config.pool_size = pool_size;
    }

    match cli.command {
        Commands::Articles {
            input,
            output,
            cutoff,
            retries,
        } => {
            let cutoff = cutoff.unwrap_or(config.cutoff);
            let ceiling = retries.unwrap_or(config.article_retry_ceiling);

            let titles = io::read_titles(&input)?;
            info!(titles = titles.len(), %cutoff, "Starting article harvest");

            let wiki = MediaWikiClient::new(&config.mediawiki_url, &config.user_agent);
            let ores = OresClient::new(&config.ores_url, &config.ores_context, &config.user_agent);
            let resolver = WikiResolver::new(wiki, ores, cutoff);

            let stats =
                harvest::harvest_articles(&resolver, &titles, ceiling, config.pool_size, &output)
                    .await?;
            info!("{stats}");
        }
        Commands::Candidates {
            input,
            output,
            retries,
            fill_missing,
        } => {
            let ceiling = retries.unwrap_or(config.claim_retry_ceiling);

            let claims = io::read_claims(&input)?;
            info!(claims = claims.len(), "Starting candidate harvest");

            let wiki = MediaWikiClient::new(&config.mediawiki_url, &config.user_agent);
            let searcher = WikiSearcher::new(
                wiki,
                config.search_limit,
                Duration::from_millis(config.search_timeout_ms),
            );

            let stats = harvest::harvest_candidates(
                &searcher,
                &claims,
                ceiling,
                config.pool_size,
                fill_missing,
                &output,
            )
            .await?;
            info!("{stats}");
        }
    }

    Ok(())
}
