//! Console lines for pipeline events.

use waybackup_core::pipeline::{FinderEvent, RunSummary, SkipReason};
use waybackup_core::progress;

/// One console line per event.
pub fn format_event(event: &FinderEvent<'_>) -> String {
    match event {
        FinderEvent::FetchStarted { domain } => {
            format!("\nFetching URLs from the Wayback Machine for {}...", domain)
        }
        FinderEvent::LinesFetched { count, .. } => format!("  fetched {} URLs...", count),
        FinderEvent::FetchGaveUp { domain, attempts } => {
            format!("Error fetching URLs for {} after {} attempts.", domain, attempts)
        }
        FinderEvent::DomainSkipped { domain, reason } => match reason {
            SkipReason::FetchGaveUp { .. } => format!("No URLs fetched for {}. Skipping...", domain),
            SkipReason::NoExtensions => {
                format!("No extensions to match for {}. Skipping...", domain)
            }
        },
        FinderEvent::BucketSaved { file, .. } => format!(
            "Filtered URLs for {} ({}) saved to: {}",
            file.extension,
            file.count,
            file.path.display()
        ),
        FinderEvent::DomainFailed { domain, error } => {
            format!("Could not save results for {}: {:#}", domain, error)
        }
        FinderEvent::SnapshotFound { snapshot, .. } => {
            format!("[+] Found possible backup: {}", snapshot)
        }
        FinderEvent::SnapshotMissing { url } => {
            format!("[-] No archived snapshot found for {}.", url)
        }
        FinderEvent::SnapshotFailed { url, error } => {
            format!("[?] Error checking Wayback snapshot for {}: {}", url, error)
        }
    }
}

/// The line to print for `event`. Line counts arrive while the spinner may be
/// drawing on stderr, so they first clear the spinner's line.
pub fn console_line(event: &FinderEvent<'_>, spinner_drawn: bool) -> String {
    match event {
        FinderEvent::LinesFetched { .. } if spinner_drawn => {
            format!("{}{}", progress::CLEAR_LINE, format_event(event))
        }
        _ => format_event(event),
    }
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "{} domain(s): {} processed, {} skipped, {} failed; {} possible backup(s) found.",
        summary.domains.len(),
        summary.processed(),
        summary.skipped(),
        summary.failed(),
        summary.snapshots_found()
    )
}
