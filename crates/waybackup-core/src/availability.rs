//! Availability checker: ask the Wayback availability endpoint for the
//! closest archived capture of one URL.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::http::{HttpGet, TransportError};

#[derive(Debug, Default, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ClosestSnapshot {
    url: Option<String>,
}

/// Why a lookup produced no answer.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of one availability lookup.
#[derive(Debug)]
pub enum SnapshotCheck {
    Found(String),
    Missing,
    /// Lookup failed; treated like `Missing` by the pipeline.
    Failed(CheckError),
}

impl SnapshotCheck {
    pub fn snapshot_url(&self) -> Option<&str> {
        match self {
            SnapshotCheck::Found(url) => Some(url),
            SnapshotCheck::Missing | SnapshotCheck::Failed(_) => None,
        }
    }
}

/// Availability query for `target`.
pub fn availability_url(endpoint: &Url, target: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().append_pair("url", target);
    url
}

/// Extract `archived_snapshots.closest.url` from a response body.
/// An empty URL string counts as absent.
pub fn parse_availability(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let resp: AvailabilityResponse = serde_json::from_slice(body)?;
    Ok(resp
        .archived_snapshots
        .closest
        .and_then(|c| c.url)
        .filter(|u| !u.is_empty()))
}

/// Look up the closest archived snapshot of `original`. Never retries; any
/// failure comes back as [`SnapshotCheck::Failed`].
pub fn check_snapshot<H>(
    http: &H,
    endpoint: &Url,
    timeout: Duration,
    original: &str,
) -> SnapshotCheck
where
    H: HttpGet + ?Sized,
{
    let url = availability_url(endpoint, original);
    let result = http
        .get(url.as_str(), timeout)
        .map_err(CheckError::from)
        .and_then(|body| parse_availability(&body).map_err(CheckError::from));
    match result {
        Ok(Some(snapshot)) => {
            tracing::info!(original, snapshot = %snapshot, "found archived snapshot");
            SnapshotCheck::Found(snapshot)
        }
        Ok(None) => {
            tracing::debug!(original, "no archived snapshot");
            SnapshotCheck::Missing
        }
        Err(e) => {
            tracing::warn!(original, "availability check failed: {}", e);
            SnapshotCheck::Failed(e)
        }
    }
}
