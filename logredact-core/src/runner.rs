// logredact-core/src/runner.rs
//! Orchestrates a redaction pass: walk the targets, rewrite each file, and
//! account for the results.
//!
//! Files are handled one at a time and independently. A file that cannot be
//! read (including non-UTF-8 content) is recorded as skipped; a file that
//! cannot be written back is recorded as a failed write. Neither stops the run.
//! In preview mode nothing is written but the counts are identical.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RuleSet;
use crate::engine::SanitizationEngine;
use crate::engines::rule_engine::RuleEngine;
use crate::report::MatchReport;
use crate::walker::eligible_files;

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Scan and count, but never write.
    pub dry_run: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Changed(usize),
    Skipped(String),
    WriteFailed { changes: usize, reason: String },
}

/// Drives an engine over every eligible file of a rule set.
pub struct Runner<'a, E: SanitizationEngine> {
    rule_set: &'a RuleSet,
    engine: E,
    options: RunOptions,
}

impl<'a> Runner<'a, RuleEngine> {
    /// Builds a runner with a [`RuleEngine`] over the rules `rule_set` already compiled.
    pub fn new(rule_set: &'a RuleSet, options: RunOptions) -> Self {
        Self::with_engine(rule_set, RuleEngine::from_rule_set(rule_set), options)
    }
}

impl<'a, E: SanitizationEngine> Runner<'a, E> {
    pub fn with_engine(rule_set: &'a RuleSet, engine: E, options: RunOptions) -> Self {
        Self {
            rule_set,
            engine,
            options,
        }
    }

    /// Processes every eligible file and returns the accumulated report.
    pub fn run(&self) -> MatchReport {
        info!(
            "Starting redaction run over {} target(s){}.",
            self.rule_set.targets.len(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );
        if self.rule_set.compiled().is_empty() {
            info!("No rules configured; files are scanned but never changed.");
        }
        let report = eligible_files(self.rule_set)
            .map(|path| self.file_report(path))
            .fold(MatchReport::new(self.options.dry_run), MatchReport::merge);
        info!(
            "Redaction run finished: {} file(s) scanned, {} touched, {} replacements.",
            report.files_scanned,
            report.files_touched(),
            report.total_replacements()
        );
        report
    }

    fn file_report(&self, path: PathBuf) -> MatchReport {
        let mut report = MatchReport::new(self.options.dry_run);
        match self.process_file(&path) {
            FileOutcome::Unchanged => report.record(path, 0),
            FileOutcome::Changed(n) => report.record(path, n),
            FileOutcome::Skipped(reason) => report.record_skip(path, reason),
            FileOutcome::WriteFailed { changes, reason } => report.record_write_failure(path, changes, reason),
        }
        report
    }

    /// Reads, rewrites and (unless previewing) writes back a single file.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let source = match read_text(path) {
            Ok(text) => text,
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                return FileOutcome::Skipped(reason);
            }
        };

        let out = self.engine.sanitize(&source, &path.display().to_string());
        if !out.is_changed() {
            debug!("{}: no matches.", path.display());
            return FileOutcome::Unchanged;
        }

        if !self.options.dry_run {
            if let Err(e) = fs::write(path, &out.content) {
                warn!("Failed to write {}: {}", path.display(), e);
                return FileOutcome::WriteFailed {
                    changes: out.changes,
                    reason: e.to_string(),
                };
            }
            debug!("Wrote {} ({} replacements).", path.display(), out.changes);
        }
        FileOutcome::Changed(out.changes)
    }
}

fn read_text(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8 ({})", e.utf8_error()))
}

/// Runs the rules of `rule_set` once over its targets.
pub fn run_rule_set(rule_set: &RuleSet, options: RunOptions) -> MatchReport {
    Runner::new(rule_set, options).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Rule, RuleKind};
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn rule_set(root: &Path, rules: Vec<Rule>) -> RuleSet {
        RuleSet::new(rules, vec![root.to_path_buf()], BTreeSet::from([".md".to_string()])).unwrap()
    }

    #[test]
    fn non_utf8_files_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, b'F', b'o', b'o']).unwrap();
        fs::write(dir.path().join("good.md"), "Foo").unwrap();
        let set = rule_set(dir.path(), vec![Rule::new(RuleKind::Word, "Foo", "Bar")]);

        let report = run_rule_set(&set, RunOptions::default());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, dir.path().join("bad.md"));
        assert_eq!(report.total_replacements(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("good.md")).unwrap(), "Bar");
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "Foo Foo").unwrap();
        let set = rule_set(dir.path(), vec![Rule::new(RuleKind::Word, "Foo", "Bar")]);

        let report = run_rule_set(&set, RunOptions { dry_run: true });
        assert!(report.dry_run);
        assert_eq!(report.total_replacements(), 2);
        assert_eq!(fs::read_to_string(&file).unwrap(), "Foo Foo");
    }

    #[cfg(unix)]
    #[test]
    fn write_failures_do_not_stop_the_run() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("a.md");
        let open = dir.path().join("b.md");
        fs::write(&locked, "Foo").unwrap();
        fs::write(&open, "Foo").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();

        // Root can write read-only files; nothing to observe in that case.
        if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
            return;
        }

        let set = rule_set(dir.path(), vec![Rule::new(RuleKind::Word, "Foo", "Bar")]);
        let report = run_rule_set(&set, RunOptions::default());
        assert!(report.has_failures());
        assert_eq!(report.failed_writes[0].path, locked);
        assert_eq!(report.failed_writes[0].changes, 1);
        assert_eq!(report.files_touched(), 1);
        assert_eq!(fs::read_to_string(&open).unwrap(), "Bar");
    }
}
