// ABOUTME: CLI for parsing podcast feeds and OPML subscription lists with castparse-feed.
// ABOUTME: Fetches a document from URL or file/stdin and prints the resulting feeds as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use castparse_feed::{
    normalize_feed_url, supports_content_type, CancellationToken, DocumentRetriever, FeedError,
    PodcastParser, PodcastParserBuilder,
};
use clap::Parser;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Parse podcast feeds (RSS, Atom, or OPML) and output JSON.
#[derive(Parser, Debug)]
#[command(name = "castparse")]
#[command(about = "Parse podcast feeds and subscription lists and print JSON", long_about = None)]
struct Args {
    /// Feed URL(s) or local file paths. Use "-" to read one document from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Override the source URL (only valid when a single target is provided).
    #[arg(long)]
    feed_url: Option<String>,

    /// Parse feed metadata only, skipping episodes.
    #[arg(long, default_value_t = false)]
    metadata_only: bool,

    /// Cancel outline traversal after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Per-request timeout in seconds for fetching documents.
    #[arg(long, default_value_t = 30)]
    fetch_timeout: u64,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Log debug diagnostics to stderr (overridden by RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// Fetches referenced documents over HTTP, skipping unsupported content types.
struct HttpRetriever {
    client: HttpClient,
}

impl HttpRetriever {
    fn new(timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("castparse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let url = normalize_feed_url(url).ok_or_else(|| FeedError::fetch(url, "not an http(s) URL"))?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FeedError::fetch(url.as_str(), e))?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !supports_content_type(&content_type) {
            return Err(FeedError::fetch(
                url.as_str(),
                format!("unsupported content type {}", content_type),
            ));
        }

        let bytes = resp.bytes().map_err(|e| FeedError::fetch(url.as_str(), e))?;
        debug!(url = url.as_str(), len = bytes.len(), "fetched document");
        Ok(bytes.to_vec())
    }
}

impl DocumentRetriever for HttpRetriever {
    fn retrieve(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        self.get(url)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.targets.len() > 1 && args.feed_url.is_some() {
        bail!("--feed-url is only valid when parsing a single target");
    }

    let retriever = HttpRetriever::new(Duration::from_secs(args.fetch_timeout))?;
    let parser = PodcastParserBuilder::new().build(retriever);

    let cancel = CancellationToken::new();
    if let Some(secs) = args.timeout {
        let token = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            token.cancel();
        });
    }

    let mut results = Vec::new();

    for target in &args.targets {
        let feed_url = args.feed_url.clone().unwrap_or_else(|| source_url(target));

        let outcome = load_bytes(target, &parser).and_then(|bytes| {
            parser
                .load(&bytes, &feed_url, !args.metadata_only, &cancel)
                .map_err(anyhow::Error::new)
        });
        match outcome {
            Ok(feeds) => {
                info!(source = target.as_str(), feeds = feeds.len(), "parsed document");
                let ok = !feeds.is_empty();
                let error = if ok { json!(null) } else { json!("could not read this feed") };
                results.push(json!({
                    "feed_url": feed_url,
                    "ok": ok,
                    "feeds": feeds,
                    "error": error
                }))
            }
            Err(err) => results.push(json!({
                "feed_url": feed_url,
                "ok": false,
                "feeds": [],
                "error": err.to_string()
            })),
        }
    }

    // Output format:
    // - Single target and ok => emit the feed list
    // - Otherwise emit an envelope with results and counts
    let output = if args.targets.len() == 1 {
        match results.first() {
            Some(first) if first.get("ok").and_then(|v| v.as_bool()) == Some(true) => {
                first.get("feeds").cloned().unwrap_or_else(|| json!([]))
            }
            _ => json!({ "results": results, "total": results.len(), "parsed": 0, "failed": 1 }),
        }
    } else {
        let parsed = results
            .iter()
            .filter(|r| r.get("ok").and_then(|v| v.as_bool()) == Some(true))
            .count();
        let failed = results.len() - parsed;
        json!({
            "results": results,
            "total": results.len(),
            "parsed": parsed,
            "failed": failed
        })
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn is_remote(target: &str) -> bool {
    target.contains("://") && !target.starts_with("file://")
}

/// The URL recorded as a feed's source when the document declares none.
fn source_url(target: &str) -> String {
    if is_remote(target) {
        normalize_feed_url(target)
            .map(String::from)
            .unwrap_or_else(|| target.to_string())
    } else {
        target.to_string()
    }
}

fn load_bytes(target: &str, parser: &PodcastParser<HttpRetriever>) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    if is_remote(target) {
        return Ok(parser.retriever().get(target)?);
    }

    let path = PathBuf::from(target.trim_start_matches("file://"));
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
