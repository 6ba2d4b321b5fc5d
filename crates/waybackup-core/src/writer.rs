//! Result writer: one newline-joined URL file per non-empty bucket.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::filter::{extension_token, BucketMap};

const FILE_SUFFIX: &str = "_filtered_urls.txt";

/// One written bucket file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBucket {
    pub extension: String,
    pub path: PathBuf,
    pub count: usize,
}

/// Everything written for one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedUrls {
    pub files: Vec<SavedBucket>,
    /// All written URLs, bucket by bucket, in bucket order.
    pub urls: Vec<String>,
}

/// Make a string safe as a single file name component.
///
/// Path separators, NUL and control characters become `_`. A result that
/// would be empty or all dots (`.`, `..`) is replaced by underscores so it
/// can never name the current or parent directory.
fn path_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        return "_".to_string();
    }
    if cleaned.chars().all(|c| c == '.') {
        return "_".repeat(cleaned.len());
    }
    cleaned
}

/// Per-domain output directory under `output_dir`.
pub fn domain_dir(output_dir: &Path, domain: &str) -> PathBuf {
    output_dir.join(path_component(domain))
}

/// `<domain>_<ext>_filtered_urls.txt`, extension without surrounding dots.
pub fn bucket_file_name(domain: &str, extension: &str) -> String {
    format!(
        "{}_{}{}",
        path_component(domain),
        path_component(extension_token(extension)),
        FILE_SUFFIX
    )
}

/// Write each non-empty bucket to `<output_dir>/<domain>/`, replacing any
/// earlier file of the same name. The directory is only created when at
/// least one bucket has URLs.
///
/// Fails before writing anything if two buckets would land in the same file.
pub fn save_urls(output_dir: &Path, domain: &str, buckets: &BucketMap) -> Result<SavedUrls> {
    let dir = domain_dir(output_dir, domain);
    let mut saved = SavedUrls::default();

    let mut names = HashSet::new();
    for bucket in buckets.iter().filter(|b| !b.urls.is_empty()) {
        let name = bucket_file_name(domain, &bucket.extension);
        if !names.insert(name.clone()) {
            bail!(
                "extension {:?} maps to {} which another extension already uses",
                bucket.extension,
                name
            );
        }
    }

    for bucket in buckets {
        if bucket.urls.is_empty() {
            continue;
        }
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(bucket_file_name(domain, &bucket.extension));
        fs::write(&path, bucket.urls.join("\n"))
            .with_context(|| format!("write {}", path.display()))?;
        tracing::info!(
            domain,
            extension = %bucket.extension,
            count = bucket.urls.len(),
            "saved filtered URLs to {}",
            path.display()
        );
        saved.urls.extend(bucket.urls.iter().cloned());
        saved.files.push(SavedBucket {
            extension: bucket.extension.clone(),
            path,
            count: bucket.urls.len(),
        });
    }

    Ok(saved)
}

/// Read a bucket file back into its URL list.
pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(text
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
