//! The `check` command: a sanity scan over generated HTML pages.
//!
//! Each page must contain the configured required substrings and a `<pre>`
//! element carrying the marker class, and must not contain any banned literal
//! (whole word, any case) or banned pattern. Banned literals reuse the
//! `word_ci` rule compiler from the core crate.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use logredact_core::config::CheckConfig;
use logredact_core::{compile_rule, CompiledRule, Rule, RuleKind};

use crate::commands::error_msg;
use crate::ui::output_format::styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Exit status when the directory is missing or holds no candidate pages.
pub const EXIT_NOTHING_TO_SCAN: u8 = 2;

/// The result of scanning one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FileVerdict {
    pub path: PathBuf,
    pub issues: Vec<String>,
    pub size_kb: f64,
}

impl FileVerdict {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Compiled form of a [`CheckConfig`].
#[derive(Debug)]
pub struct SanityChecker {
    required_substrings: Vec<String>,
    marker_class: String,
    marker: Regex,
    banned_literals: Vec<(String, CompiledRule)>,
    banned_patterns: Vec<(String, Regex)>,
    file_pattern: Option<Regex>,
}

impl SanityChecker {
    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let marker = RegexBuilder::new(&format!(
            r#"<pre[^>]*class="[^"]*\b{}\b[^"]*"[^>]*>"#,
            regex::escape(&config.marker_class)
        ))
        .case_insensitive(true)
        .build()
        .context("Invalid marker class")?;

        let banned_literals = config
            .banned_literals
            .iter()
            .filter(|lit| !lit.is_empty())
            .enumerate()
            .map(|(i, lit)| {
                compile_rule(&Rule::new(RuleKind::WordCi, lit.as_str(), ""), i + 1)
                    .map(|rule| (lit.clone(), rule))
                    .with_context(|| format!("Invalid banned literal #{}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let banned_patterns = config
            .banned_patterns
            .iter()
            .map(|banned| {
                Regex::new(&banned.pattern)
                    .map(|re| (banned.label.clone(), re))
                    .with_context(|| format!("Invalid banned pattern '{}'", banned.label))
            })
            .collect::<Result<Vec<_>>>()?;

        let file_pattern = config
            .file_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid file_pattern")?;

        Ok(Self {
            required_substrings: config.required_substrings.clone(),
            marker_class: config.marker_class.clone(),
            marker,
            banned_literals,
            banned_patterns,
            file_pattern,
        })
    }

    /// Returns every problem found in `text`, in a stable order.
    pub fn scan_text(&self, text: &str) -> Vec<String> {
        let mut issues = Vec::new();

        for required in &self.required_substrings {
            if !text.contains(required.as_str()) {
                issues.push(format!("missing required substring: {}", required));
            }
        }

        if !self.marker.is_match(text) {
            issues.push(format!("missing <pre> with class including '{}'", self.marker_class));
        }

        let literal_hits: BTreeSet<&str> = self
            .banned_literals
            .iter()
            .filter(|(_, rule)| rule.is_match(text))
            .map(|(lit, _)| lit.as_str())
            .collect();
        if !literal_hits.is_empty() {
            issues.push(format!(
                "banned literals present: {}",
                literal_hits.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let pattern_hits: BTreeSet<&str> = self
            .banned_patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(label, _)| label.as_str())
            .collect();
        if !pattern_hits.is_empty() {
            issues.push(format!(
                "banned patterns present: {}",
                pattern_hits.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        issues
    }

    pub fn scan_file(&self, path: &Path) -> FileVerdict {
        let (issues, size) = match fs::read(path) {
            Ok(bytes) => (self.scan_text(&String::from_utf8_lossy(&bytes)), bytes.len()),
            Err(e) => (vec![format!("unreadable: {}", e)], 0),
        };
        FileVerdict {
            path: path.to_path_buf(),
            issues,
            size_kb: size as f64 / 1024.0,
        }
    }

    /// The `.html` files directly inside `dir` that pass the file-name filter, sorted.
    pub fn candidate_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"))
            .filter(|p| {
                let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                self.file_pattern.as_ref().is_none_or(|re| re.is_match(&name))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Writes the verdict lines and the final tally.
pub fn print_verdicts<W: Write>(
    verdicts: &[FileVerdict],
    dir: &Path,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "Scanning {} files in {}...\n", verdicts.len(), dir.display())?;
    let mut bad = 0usize;
    for verdict in verdicts {
        if verdict.passed() {
            writeln!(
                writer,
                "{}   {} ({:.1}KB)",
                styled("OK:", ThemeEntry::Success, theme_map, supports_color),
                verdict.path.display(),
                verdict.size_kb
            )?;
        } else {
            bad += 1;
            writeln!(
                writer,
                "{} {} ({:.1}KB)",
                styled("FAIL:", ThemeEntry::Error, theme_map, supports_color),
                verdict.path.display(),
                verdict.size_kb
            )?;
            for issue in &verdict.issues {
                writeln!(writer, "  - {}", issue)?;
            }
            writeln!(writer)?;
        }
    }
    writeln!(writer, "\nDone. OK: {} | FAIL: {}", verdicts.len() - bad, bad)
}

pub fn run_check(dir: &Path, config: &CheckConfig, theme_map: &ThemeMap) -> Result<ExitCode> {
    info!("Starting sanity check of {}", dir.display());
    if !dir.is_dir() {
        error_msg(format!("Missing directory: {}", dir.display()), theme_map);
        return Ok(ExitCode::from(EXIT_NOTHING_TO_SCAN));
    }

    let checker = SanityChecker::from_config(config)?;
    let files = checker.candidate_files(dir)?;
    if files.is_empty() {
        error_msg(format!("No .html files found in {}", dir.display()), theme_map);
        return Ok(ExitCode::from(EXIT_NOTHING_TO_SCAN));
    }

    let verdicts: Vec<FileVerdict> = files.iter().map(|p| checker.scan_file(p)).collect();
    let failed = verdicts.iter().filter(|v| !v.passed()).count();
    debug!("{} of {} pages failed.", failed, verdicts.len());

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    print_verdicts(&verdicts, dir, &mut stdout.lock(), theme_map, supports_color)
        .context("Failed to print results")?;

    Ok(if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[cfg(test)]
mod tests {
    use super::*;
    use logredact_core::config::BannedPattern;

    const GOOD_PAGE: &str = "<!DOCTYPE html><html><pre class=\"log log-pre\">hello</pre></html>";

    fn checker(literals: &[&str]) -> SanityChecker {
        let config = CheckConfig {
            banned_literals: literals.iter().map(|s| s.to_string()).collect(),
            ..CheckConfig::default()
        };
        SanityChecker::from_config(&config).unwrap()
    }

    #[test]
    fn clean_page_passes() {
        assert!(checker(&["Jerry"]).scan_text(GOOD_PAGE).is_empty());
    }

    #[test]
    fn structure_problems_are_reported() {
        let issues = checker(&[]).scan_text("<html><pre>x</pre></html>");
        assert_eq!(
            issues,
            vec![
                "missing required substring: <!DOCTYPE html>".to_string(),
                "missing <pre> with class including 'log-pre'".to_string(),
            ]
        );
    }

    #[test]
    fn banned_literals_are_whole_word_and_case_insensitive() {
        let c = checker(&["Psy", "Hardin"]);
        let page = GOOD_PAGE.replace("hello", "psy and HARDIN but not Psychology");
        assert_eq!(c.scan_text(&page), vec!["banned literals present: Hardin, Psy".to_string()]);
        let page = GOOD_PAGE.replace("hello", "Psychology");
        assert!(c.scan_text(&page).is_empty());
    }

    #[test]
    fn default_patterns_catch_leaks() {
        let page = GOOD_PAGE.replace("hello", "mail me@site.org from /Users/jo/notes");
        assert_eq!(
            checker(&[]).scan_text(&page),
            vec!["banned patterns present: email address, macOS user path".to_string()]
        );
    }

    #[test]
    fn custom_patterns_are_labelled() {
        let config = CheckConfig {
            banned_patterns: vec![BannedPattern { pattern: r"case-\d+".into(), label: "case id".into() }],
            ..CheckConfig::default()
        };
        let c = SanityChecker::from_config(&config).unwrap();
        let page = GOOD_PAGE.replace("hello", "see case-12");
        assert_eq!(c.scan_text(&page), vec!["banned patterns present: case id".to_string()]);
    }

    #[test]
    fn file_pattern_filters_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("07-02-2025.html"), GOOD_PAGE).unwrap();
        fs::write(dir.path().join("index.html"), GOOD_PAGE).unwrap();
        fs::write(dir.path().join("07-02-2025.md"), "").unwrap();
        let config = CheckConfig {
            file_pattern: Some(r"^\d{2}-\d{2}-\d{4}.*\.html$".into()),
            ..CheckConfig::default()
        };
        let c = SanityChecker::from_config(&config).unwrap();
        assert_eq!(c.candidate_files(dir.path()).unwrap(), vec![dir.path().join("07-02-2025.html")]);
    }

    #[test]
    fn verdict_output_format() {
        let verdicts = vec![
            FileVerdict { path: "a.html".into(), issues: vec![], size_kb: 1.0 },
            FileVerdict { path: "b.html".into(), issues: vec!["x".into()], size_kb: 0.5 },
        ];
        let mut buf = Vec::new();
        let theme = crate::ui::theme::ThemeStyle::default_theme_map();
        print_verdicts(&verdicts, Path::new("out"), &mut buf, &theme, false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Scanning 2 files in out...\n\nOK:   a.html (1.0KB)\nFAIL: b.html (0.5KB)\n  - x\n\n\nDone. OK: 1 | FAIL: 1\n"
        );
    }
}
