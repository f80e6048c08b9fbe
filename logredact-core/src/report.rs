// logredact-core/src/report.rs
//! Run-level accounting for a redaction pass.
//!
//! A [`MatchReport`] collects one [`FileChange`] per file that had at least one
//! replacement, plus the files that were skipped or could not be written.
//! Reports for disjoint sets of files can be combined with [`MatchReport::merge`].

use std::path::PathBuf;

/// Maximum number of touched files listed in a printed report.
pub const LISTING_CAP: usize = 50;

/// A file with a nonzero number of replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub changes: usize,
}

/// A file that was not processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIssue {
    pub path: PathBuf,
    pub reason: String,
}

/// A file whose replacements were computed but could not be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedWrite {
    pub path: PathBuf,
    /// Replacements that were lost because the write failed.
    pub changes: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// True when no file was written.
    pub dry_run: bool,
    pub touched: Vec<FileChange>,
    /// Files that could not be read.
    pub skipped: Vec<FileIssue>,
    /// Files that had changes but could not be written back.
    pub failed_writes: Vec<FailedWrite>,
    /// Number of eligible files visited.
    pub files_scanned: usize,
}

impl MatchReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Records a scanned file. Zero-change files only bump the scan counter.
    pub fn record(&mut self, path: PathBuf, changes: usize) {
        self.files_scanned += 1;
        if changes > 0 {
            self.touched.push(FileChange { path, changes });
        }
    }

    pub fn record_skip(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.skipped.push(FileIssue {
            path,
            reason: reason.into(),
        });
    }

    /// Records a file whose new content could not be written.
    pub fn record_write_failure(&mut self, path: PathBuf, changes: usize, reason: impl Into<String>) {
        self.files_scanned += 1;
        self.failed_writes.push(FailedWrite {
            path,
            changes,
            reason: reason.into(),
        });
    }

    /// Folds another report into this one, keeping `self`'s entries first.
    pub fn merge(mut self, other: MatchReport) -> MatchReport {
        self.dry_run = self.dry_run && other.dry_run;
        self.touched.extend(other.touched);
        self.skipped.extend(other.skipped);
        self.failed_writes.extend(other.failed_writes);
        self.files_scanned += other.files_scanned;
        self
    }

    pub fn files_touched(&self) -> usize {
        self.touched.len()
    }

    pub fn total_replacements(&self) -> usize {
        self.touched.iter().map(|f| f.changes).sum()
    }

    /// The touched files that fit under [`LISTING_CAP`], and how many were left out.
    pub fn capped_listing(&self) -> (&[FileChange], usize) {
        let shown = self.touched.len().min(LISTING_CAP);
        (&self.touched[..shown], self.touched.len() - shown)
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_writes.is_empty()
    }
}
