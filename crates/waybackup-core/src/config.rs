use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry parameters for the CDX index fetch (`[retry]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per domain (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts, in seconds.
    pub delay_secs: u64,
    /// One-off sleep after the last attempt fails, in seconds.
    pub cooldown_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 5,
            cooldown_secs: 300,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: cfg.max_attempts.max(1),
            delay: Duration::from_secs(cfg.delay_secs),
            cooldown: Duration::from_secs(cfg.cooldown_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/waybackup/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaybackupConfig {
    /// Root directory for per-domain output folders.
    pub output_dir: PathBuf,
    /// Default extension list, one `.ext` per line.
    pub extensions_file: PathBuf,
    /// CDX index endpoint queried once per domain.
    pub index_endpoint: String,
    /// Availability endpoint queried once per filtered URL.
    pub availability_endpoint: String,
    /// Stall bound for the index stream: an attempt fails once no data has
    /// arrived for this many seconds. It is not a cap on the whole stream,
    /// which can run far longer for large domains. Values below 1 are raised
    /// to 1.
    pub fetch_timeout_secs: u64,
    /// Total timeout for one availability lookup. Values below 1 are raised to 1.
    pub check_timeout_secs: u64,
    /// Report the streamed line count every N lines (0 disables).
    pub progress_every_lines: u64,
    /// Look up an archived snapshot for every saved URL.
    pub check_availability: bool,
    pub retry: RetryConfig,
}

impl Default for WaybackupConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("content"),
            extensions_file: PathBuf::from("extensions.txt"),
            index_endpoint: "https://web.archive.org/cdx/search/cdx".to_string(),
            availability_endpoint: "https://archive.org/wayback/available".to_string(),
            fetch_timeout_secs: 60,
            check_timeout_secs: 30,
            progress_every_lines: 1000,
            check_availability: true,
            retry: RetryConfig::default(),
        }
    }
}

impl WaybackupConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.retry)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("waybackup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WaybackupConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WaybackupConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<WaybackupConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: WaybackupConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
