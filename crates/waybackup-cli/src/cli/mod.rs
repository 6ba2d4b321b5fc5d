//! CLI for waybackup.

mod extensions;
mod render;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use waybackup_core::config::{self, WaybackupConfig};
use waybackup_core::http::CurlHttp;
use waybackup_core::lists;
use waybackup_core::pipeline::WaybackFinder;
use waybackup_core::progress;
use waybackup_core::retry::ThreadSleeper;

/// Where the extension set comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtensionSource {
    /// Type extensions at the prompt (or pass them with --ext).
    Custom,
    /// Read them from the extensions file.
    Load,
}

/// Find archived copies of a domain's files in the Wayback Machine.
#[derive(Debug, Parser)]
#[command(name = "waybackup", version)]
#[command(about = "Find archived backups of a domain's files in the Wayback Machine", long_about = None)]
pub struct Cli {
    /// File with one target domain per line.
    #[arg(value_name = "DOMAINS_FILE", required_unless_present = "completions")]
    pub domains: Option<PathBuf>,

    /// Extension list to load (one `.ext` per line). Defaults to the config value.
    #[arg(long, value_name = "PATH")]
    pub extensions: Option<PathBuf>,

    /// Extension source; asked interactively when omitted.
    #[arg(long, value_enum)]
    pub source: Option<ExtensionSource>,

    /// Custom extension to match (repeatable). Implies `--source custom`.
    #[arg(long = "ext", value_name = "EXT")]
    pub ext: Vec<String>,

    /// Root directory for per-domain result folders.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Use this config file instead of ~/.config/waybackup/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only save filtered URL lists; skip availability lookups.
    #[arg(long)]
    pub no_check: bool,

    /// Do not draw the fetch spinner.
    #[arg(long)]
    pub no_spinner: bool,

    /// Print shell completions and exit.
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    /// Fold command-line overrides into the loaded config.
    pub fn apply_to(&self, cfg: &mut WaybackupConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(path) = &self.extensions {
            cfg.extensions_file = path.clone();
        }
        if self.no_check {
            cfg.check_availability = false;
        }
    }
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "waybackup", &mut io::stdout());
        return Ok(());
    }

    let mut cfg = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    cli.apply_to(&mut cfg);
    tracing::debug!("loaded config: {:?}", cfg);

    let domains_path = cli.domains.as_deref().context("missing DOMAINS_FILE")?;
    let domains = lists::load_domains_or_empty(domains_path);
    if domains.is_empty() {
        println!("No domains to process in {}.", domains_path.display());
        return Ok(());
    }

    let extensions = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        extensions::resolve(
            cli.source,
            &cli.ext,
            &cfg.extensions_file,
            &mut stdin.lock(),
            &mut stdout.lock(),
        )?
    };
    tracing::info!(
        domains = domains.len(),
        extensions = ?extensions,
        "starting run"
    );

    let spinner_drawn = progress::spinner_visible(!cli.no_spinner);
    let finder = WaybackFinder::new(&cfg, CurlHttp::default(), ThreadSleeper)?
        .with_spinner(!cli.no_spinner);
    let summary = finder.run(&domains, &extensions, &mut |event| {
        println!("{}", render::console_line(&event, spinner_drawn));
    });

    println!("\nProcess complete for all domains.");
    println!("{}", render::format_summary(&summary));
    Ok(())
}

#[cfg(test)]
mod tests;
