//! Domain orchestrator: fetch, filter, save and check, one domain at a time.

use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::availability::{self, SnapshotCheck};
use crate::config::WaybackupConfig;
use crate::filter::BucketMap;
use crate::http::HttpGet;
use crate::index::{self, FetchOptions, FetchOutcome};
use crate::retry::Sleeper;
use crate::writer::{self, SavedBucket, SavedUrls};

/// Progress notifications for whoever drives the run (the CLI prints them).
#[derive(Debug)]
pub enum FinderEvent<'a> {
    FetchStarted { domain: &'a str },
    LinesFetched { domain: &'a str, count: u64 },
    FetchGaveUp { domain: &'a str, attempts: u32 },
    DomainSkipped { domain: &'a str, reason: &'a SkipReason },
    BucketSaved { domain: &'a str, file: &'a SavedBucket },
    DomainFailed { domain: &'a str, error: &'a anyhow::Error },
    SnapshotFound { url: &'a str, snapshot: &'a str },
    SnapshotMissing { url: &'a str },
    SnapshotFailed { url: &'a str, error: &'a availability::CheckError },
}

/// Why a domain produced no files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The index fetch exhausted its retries.
    FetchGaveUp { attempts: u32 },
    /// No extensions were requested, so nothing can match.
    NoExtensions,
}

/// What happened to one domain.
#[derive(Debug)]
pub enum DomainStatus {
    Processed {
        saved: SavedUrls,
        checks: Vec<(String, SnapshotCheck)>,
    },
    Skipped(SkipReason),
    /// Writing results failed; the run moved on.
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct DomainReport {
    pub domain: String,
    pub status: DomainStatus,
}

impl DomainReport {
    /// Snapshot URLs found for this domain, in check order.
    pub fn snapshots(&self) -> Vec<&str> {
        match &self.status {
            DomainStatus::Processed { checks, .. } => checks
                .iter()
                .filter_map(|(_, check)| check.snapshot_url())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub domains: Vec<DomainReport>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.domains
            .iter()
            .filter(|d| matches!(d.status, DomainStatus::Processed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.domains
            .iter()
            .filter(|d| matches!(d.status, DomainStatus::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.domains
            .iter()
            .filter(|d| matches!(d.status, DomainStatus::Failed(_)))
            .count()
    }

    pub fn snapshots_found(&self) -> usize {
        self.domains.iter().map(|d| d.snapshots().len()).sum()
    }
}

/// Runs the whole pipeline against an [`HttpGet`] transport.
pub struct WaybackFinder<H, S> {
    http: H,
    sleeper: S,
    fetch: FetchOptions,
    availability_endpoint: Url,
    check_timeout: std::time::Duration,
    check_availability: bool,
    output_dir: PathBuf,
}

impl<H: HttpGet, S: Sleeper> WaybackFinder<H, S> {
    /// Build from config. Fails only if an endpoint is not a valid URL.
    pub fn new(cfg: &WaybackupConfig, http: H, sleeper: S) -> Result<Self> {
        let index_endpoint = Url::parse(&cfg.index_endpoint)
            .with_context(|| format!("invalid index endpoint {:?}", cfg.index_endpoint))?;
        let availability_endpoint = Url::parse(&cfg.availability_endpoint).with_context(|| {
            format!("invalid availability endpoint {:?}", cfg.availability_endpoint)
        })?;
        Ok(Self {
            http,
            sleeper,
            fetch: FetchOptions::from_config(cfg, index_endpoint),
            availability_endpoint,
            check_timeout: cfg.check_timeout(),
            check_availability: cfg.check_availability,
            output_dir: cfg.output_dir.clone(),
        })
    }

    /// Turn the fetch spinner on or off (on by default; it also stays off
    /// when stderr is not a terminal).
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.fetch.spinner = enabled;
        self
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// Stream and bucket one domain's archived URLs.
    pub fn fetch_urls(
        &self,
        domain: &str,
        extensions: &[String],
        observe: &mut dyn FnMut(FinderEvent<'_>),
    ) -> FetchOutcome {
        observe(FinderEvent::FetchStarted { domain });
        index::fetch_urls(
            &self.http,
            &self.sleeper,
            &self.fetch,
            domain,
            extensions,
            &mut |count| observe(FinderEvent::LinesFetched { domain, count }),
        )
    }

    /// Write the non-empty buckets under the output directory.
    pub fn save_urls(&self, domain: &str, buckets: &BucketMap) -> Result<SavedUrls> {
        writer::save_urls(&self.output_dir, domain, buckets)
    }

    /// Closest archived snapshot of one URL.
    pub fn check_snapshot(&self, url: &str) -> SnapshotCheck {
        availability::check_snapshot(
            &self.http,
            &self.availability_endpoint,
            self.check_timeout,
            url,
        )
    }

    /// Fetch, save and check one domain. Never panics or errors out; the
    /// outcome is in the returned status.
    pub fn process_domain(
        &self,
        domain: &str,
        extensions: &[String],
        observe: &mut dyn FnMut(FinderEvent<'_>),
    ) -> DomainStatus {
        let buckets = match self.fetch_urls(domain, extensions, observe) {
            FetchOutcome::Fetched { buckets, .. } => buckets,
            FetchOutcome::GaveUp(e) => {
                observe(FinderEvent::FetchGaveUp {
                    domain,
                    attempts: e.attempts,
                });
                let reason = SkipReason::FetchGaveUp {
                    attempts: e.attempts,
                };
                tracing::warn!(domain, "no URLs fetched; skipping");
                observe(FinderEvent::DomainSkipped {
                    domain,
                    reason: &reason,
                });
                return DomainStatus::Skipped(reason);
            }
        };
        if buckets.is_empty() {
            let reason = SkipReason::NoExtensions;
            tracing::warn!(domain, "no extensions to match; skipping");
            observe(FinderEvent::DomainSkipped {
                domain,
                reason: &reason,
            });
            return DomainStatus::Skipped(reason);
        }

        let saved = match self.save_urls(domain, &buckets) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(domain, "saving filtered URLs failed: {:#}", e);
                observe(FinderEvent::DomainFailed { domain, error: &e });
                return DomainStatus::Failed(e);
            }
        };
        for file in &saved.files {
            observe(FinderEvent::BucketSaved { domain, file });
        }

        let mut checks = Vec::new();
        if self.check_availability {
            for url in &saved.urls {
                let check = self.check_snapshot(url);
                match &check {
                    SnapshotCheck::Found(snapshot) => {
                        observe(FinderEvent::SnapshotFound { url, snapshot })
                    }
                    SnapshotCheck::Missing => observe(FinderEvent::SnapshotMissing { url }),
                    SnapshotCheck::Failed(error) => {
                        observe(FinderEvent::SnapshotFailed { url, error })
                    }
                }
                checks.push((url.clone(), check));
            }
        }

        DomainStatus::Processed { saved, checks }
    }

    /// Process every domain in order; one domain's failure never stops the rest.
    pub fn run(
        &self,
        domains: &[String],
        extensions: &[String],
        observe: &mut dyn FnMut(FinderEvent<'_>),
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        for domain in domains {
            let status = self.process_domain(domain, extensions, observe);
            summary.domains.push(DomainReport {
                domain: domain.clone(),
                status,
            });
        }
        tracing::info!(
            domains = summary.domains.len(),
            processed = summary.processed(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "run complete"
        );
        summary
    }
}
