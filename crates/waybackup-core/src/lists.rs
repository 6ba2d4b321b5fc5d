//! Newline-delimited input lists: target domains and file extensions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Failure to load a list file.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Split list text into trimmed, non-empty lines, preserving order.
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_list(path: &Path) -> Result<Vec<String>, ListError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_list(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ListError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ListError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read the domain list, one domain per line.
pub fn load_domains(path: &Path) -> Result<Vec<String>, ListError> {
    read_list(path)
}

/// Read the extension list, one `.ext` per line.
pub fn load_extensions(path: &Path) -> Result<Vec<String>, ListError> {
    read_list(path)
}

/// Like [`load_domains`], but a missing or unreadable file logs and yields no domains.
pub fn load_domains_or_empty(path: &Path) -> Vec<String> {
    load_domains(path).unwrap_or_else(|e| {
        tracing::error!("domain list unavailable: {}; nothing to process", e);
        Vec::new()
    })
}

/// Like [`load_extensions`], but a missing or unreadable file logs and yields no extensions.
/// The run continues; no fetched URL will match a bucket.
pub fn load_extensions_or_empty(path: &Path) -> Vec<String> {
    load_extensions(path).unwrap_or_else(|e| {
        tracing::error!("extension list unavailable: {}; proceeding with no extensions", e);
        Vec::new()
    })
}
