//! Snapshot fetcher: stream a domain's captured URLs from the CDX index and
//! bucket them by extension.

mod query;

pub use query::index_url;

use std::time::Duration;
use url::Url;

use crate::config::WaybackupConfig;
use crate::filter::BucketMap;
use crate::http::HttpGet;
use crate::progress::{LineProgress, Spinner};
use crate::retry::{run_with_retry, RetryExhausted, RetryPolicy, Sleeper};

/// Parameters for one index fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub endpoint: Url,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub progress_every: u64,
    pub spinner: bool,
}

impl FetchOptions {
    pub fn from_config(cfg: &WaybackupConfig, endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: cfg.fetch_timeout(),
            retry: cfg.retry_policy(),
            progress_every: cfg.progress_every_lines,
            spinner: true,
        }
    }
}

/// Result of fetching one domain's index.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Stream completed; one bucket per requested extension.
    Fetched { buckets: BucketMap, lines: u64 },
    /// Every attempt failed and the cooldown was slept.
    GaveUp(RetryExhausted),
}

impl FetchOutcome {
    /// The bucket map, or an empty map when the fetch gave up.
    pub fn into_buckets(self) -> BucketMap {
        match self {
            FetchOutcome::Fetched { buckets, .. } => buckets,
            FetchOutcome::GaveUp(_) => BucketMap::default(),
        }
    }
}

/// Fetch every archived URL for `domain` and partition it by `extensions`.
///
/// Lines are collected per attempt, so a stream that breaks halfway is
/// discarded and retried from scratch. `on_progress` receives the running line
/// count every `progress_every` lines.
pub fn fetch_urls<H, S>(
    http: &H,
    sleeper: &S,
    opts: &FetchOptions,
    domain: &str,
    extensions: &[String],
    on_progress: &mut dyn FnMut(u64),
) -> FetchOutcome
where
    H: HttpGet + ?Sized,
    S: Sleeper + ?Sized,
{
    let url = index_url(&opts.endpoint, domain);
    tracing::info!(domain, "fetching archived URLs from {}", url);

    let spinner = Spinner::start("Fetching URLs...", opts.spinner);
    let result = run_with_retry(&opts.retry, sleeper, |attempt| {
        tracing::debug!(domain, attempt, "streaming index response");
        let mut urls: Vec<String> = Vec::new();
        let mut progress = LineProgress::new(opts.progress_every);
        http.get_lines(url.as_str(), opts.timeout, &mut |line| {
            urls.push(line.to_string());
            if let Some(n) = progress.tick() {
                on_progress(n);
            }
        })?;
        Ok(urls)
    });
    spinner.stop();

    match result {
        Ok(urls) => {
            let lines = urls.len() as u64;
            tracing::info!(domain, lines, "fetched {} URLs from archive", lines);
            let buckets = BucketMap::partition(&urls, extensions);
            FetchOutcome::Fetched { buckets, lines }
        }
        Err(e) => {
            tracing::error!(domain, "error fetching URLs: {}", e);
            FetchOutcome::GaveUp(e)
        }
    }
}
