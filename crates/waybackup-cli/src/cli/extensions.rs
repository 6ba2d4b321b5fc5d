//! Choosing the extension set: `--ext`, `--source`, or the interactive prompt.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use waybackup_core::lists;

use super::ExtensionSource;

/// Trim, drop empties, and make sure each entry starts with a dot.
pub fn normalize<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in raw {
        for part in entry.as_ref().split(|c: char| c == ',' || c.is_whitespace()) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let ext = if part.starts_with('.') {
                part.to_string()
            } else {
                format!(".{}", part)
            };
            if !out.contains(&ext) {
                out.push(ext);
            }
        }
    }
    out
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("read answer")?;
    Ok(line.trim().to_string())
}

fn parse_source(answer: &str) -> Result<ExtensionSource> {
    match answer.to_lowercase().as_str() {
        "custom" | "c" => Ok(ExtensionSource::Custom),
        "load" | "l" => Ok(ExtensionSource::Load),
        other => bail!("expected \"custom\" or \"load\", got {:?}", other),
    }
}

/// Resolve the extension list for this run.
///
/// `--ext` values win; otherwise `source` (or the prompt's answer) decides
/// between asking for a custom list and loading `file`. Every source goes
/// through [`normalize`]. A missing file yields an empty list and the run
/// continues.
pub fn resolve<R: BufRead, W: Write>(
    source: Option<ExtensionSource>,
    custom: &[String],
    file: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>> {
    if !custom.is_empty() {
        return Ok(normalize(custom));
    }
    let source = match source {
        Some(s) => s,
        None => {
            let question = format!(
                "Use custom file extensions or load from {}? (custom/load): ",
                file.display()
            );
            parse_source(&ask(input, output, &question)?)?
        }
    };
    match source {
        ExtensionSource::Custom => {
            let answer = ask(input, output, "Enter extensions (e.g. .zip,.sql,.bak): ")?;
            let exts = normalize(&[answer]);
            if exts.is_empty() {
                bail!("no extensions given");
            }
            Ok(exts)
        }
        ExtensionSource::Load => {
            let exts = normalize(&lists::load_extensions_or_empty(file));
            if exts.is_empty() {
                writeln!(
                    output,
                    "No extensions loaded from {}; no URLs will match.",
                    file.display()
                )?;
            }
            Ok(exts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(
        source: Option<ExtensionSource>,
        custom: &[&str],
        file: &Path,
        answers: &str,
    ) -> (Result<Vec<String>>, String) {
        let custom: Vec<String> = custom.iter().map(|s| s.to_string()).collect();
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let res = resolve(source, &custom, file, &mut input, &mut output);
        (res, String::from_utf8(output).unwrap())
    }

    #[test]
    fn normalize_adds_dots_and_dedupes() {
        assert_eq!(
            normalize(&["pdf, .zip  sql", ".pdf", ""]),
            vec![".pdf", ".zip", ".sql"]
        );
    }

    #[test]
    fn ext_flags_skip_prompt() {
        let (res, out) = run(None, &["zip", ".bak"], Path::new("unused.txt"), "");
        assert_eq!(res.unwrap(), vec![".zip", ".bak"]);
        assert!(out.is_empty());
    }

    #[test]
    fn prompt_custom_reads_list() {
        let (res, out) = run(None, &[], Path::new("extensions.txt"), "custom\n.sql, tar.gz\n");
        assert_eq!(res.unwrap(), vec![".sql", ".tar.gz"]);
        assert!(out.contains("(custom/load)"));
    }

    #[test]
    fn prompt_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extensions.txt");
        std::fs::write(&path, ".pdf\n.zip\n").unwrap();
        let (res, _) = run(None, &[], &path, "LOAD\n");
        assert_eq!(res.unwrap(), vec![".pdf", ".zip"]);
    }

    #[test]
    fn loaded_entries_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extensions.txt");
        std::fs::write(&path, "pdf\n.pdf\n  zip \n\n.sql\n").unwrap();
        let (res, out) = run(Some(ExtensionSource::Load), &[], &path, "");
        assert_eq!(res.unwrap(), vec![".pdf", ".zip", ".sql"]);
        assert!(out.is_empty());
    }

    #[test]
    fn load_missing_file_continues_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let (res, out) = run(Some(ExtensionSource::Load), &[], &path, "");
        assert!(res.unwrap().is_empty());
        assert!(out.contains("no URLs will match"));
    }

    #[test]
    fn unknown_answer_is_error() {
        let (res, _) = run(None, &[], Path::new("extensions.txt"), "maybe\n");
        assert!(res.is_err());
    }

    #[test]
    fn empty_custom_list_is_error() {
        let (res, _) = run(Some(ExtensionSource::Custom), &[], Path::new("x"), "\n");
        assert!(res.is_err());
    }
}
