//! CLI parse tests.

use super::{Cli, ExtensionSource};
use clap::Parser;
use std::path::Path;
use waybackup_core::config::WaybackupConfig;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_domains_only() {
    let cli = parse(&["waybackup", "domains.txt"]);
    assert_eq!(cli.domains.as_deref(), Some(Path::new("domains.txt")));
    assert!(cli.source.is_none());
    assert!(cli.ext.is_empty());
    assert!(!cli.no_check);
    assert!(!cli.no_spinner);
}

#[test]
fn cli_parse_custom_extensions() {
    let cli = parse(&["waybackup", "d.txt", "--ext", ".zip", "--ext", "sql"]);
    assert_eq!(cli.ext, vec![".zip", "sql"]);
}

#[test]
fn cli_parse_source_load_with_file() {
    let cli = parse(&[
        "waybackup",
        "d.txt",
        "--source",
        "load",
        "--extensions",
        "exts.txt",
    ]);
    assert_eq!(cli.source, Some(ExtensionSource::Load));
    assert_eq!(cli.extensions.as_deref(), Some(Path::new("exts.txt")));
}

#[test]
fn cli_requires_domains_file() {
    assert!(Cli::try_parse_from(["waybackup"]).is_err());
}

#[test]
fn cli_completions_need_no_domains_file() {
    let cli = parse(&["waybackup", "--completions", "bash"]);
    assert!(cli.completions.is_some());
    assert!(cli.domains.is_none());
}

#[test]
fn cli_overrides_config() {
    let cli = parse(&[
        "waybackup",
        "d.txt",
        "--output-dir",
        "/tmp/out",
        "--extensions",
        "mine.txt",
        "--no-check",
    ]);
    let mut cfg = WaybackupConfig::default();
    cli.apply_to(&mut cfg);
    assert_eq!(cfg.output_dir, Path::new("/tmp/out"));
    assert_eq!(cfg.extensions_file, Path::new("mine.txt"));
    assert!(!cfg.check_availability);
}

#[test]
fn cli_without_overrides_keeps_config() {
    let cli = parse(&["waybackup", "d.txt"]);
    let mut cfg = WaybackupConfig::default();
    cli.apply_to(&mut cfg);
    assert_eq!(cfg, WaybackupConfig::default());
}
