//! Prints the end-of-run report of a redaction pass.

use std::io::{self, Write};

use logredact_core::MatchReport;

use crate::ui::output_format::styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub const DRY_RUN_BANNER: &str = "DRY RUN: no files written.";

/// Writes the report: per-file problems, the totals, then a capped listing of
/// touched files.
pub fn print_report<W: Write>(
    report: &MatchReport,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let paint = |text: &str, entry: ThemeEntry| styled(text, entry, theme_map, supports_color);

    for issue in &report.skipped {
        writeln!(writer, "{} {}: {}", paint("SKIP", ThemeEntry::Warn), issue.path.display(), issue.reason)?;
    }
    for failed in &report.failed_writes {
        writeln!(
            writer,
            "{} {} ({} replacements not written): {}",
            paint("FAILED", ThemeEntry::Error),
            failed.path.display(),
            failed.changes,
            failed.reason
        )?;
    }

    if report.dry_run {
        writeln!(writer, "{}\n", paint(DRY_RUN_BANNER, ThemeEntry::Header))?;
    }

    let files_label = if report.dry_run {
        "Files that would change:"
    } else {
        "Files changed:"
    };
    writeln!(writer, "{} {}", files_label, report.files_touched())?;
    writeln!(writer, "Total replacements: {}", report.total_replacements())?;

    let (shown, omitted) = report.capped_listing();
    for change in shown {
        writeln!(
            writer,
            "  {}  ({})",
            paint(&change.path.display().to_string(), ThemeEntry::SummaryFile),
            paint(&change.changes.to_string(), ThemeEntry::SummaryOccurrences)
        )?;
    }
    if omitted > 0 {
        writeln!(writer, "  ...and {} more", omitted)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    fn render(report: &MatchReport) -> String {
        let mut buf = Vec::new();
        print_report(report, &mut buf, &ThemeStyle::default_theme_map(), false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn write_mode_report() {
        let mut report = MatchReport::new(false);
        report.record("docs/a.md".into(), 1);
        report.record("docs/b.md".into(), 0);
        assert_eq!(
            render(&report),
            "Files changed: 1\nTotal replacements: 1\n  docs/a.md  (1)\n"
        );
    }

    #[test]
    fn dry_run_report_has_banner() {
        let mut report = MatchReport::new(true);
        report.record("docs/a.md".into(), 2);
        let out = render(&report);
        assert!(out.starts_with("DRY RUN: no files written.\n\n"));
        assert!(out.contains("Files that would change: 1\n"));
        assert!(out.contains("Total replacements: 2\n"));
    }

    #[test]
    fn long_listing_is_truncated() {
        let mut report = MatchReport::new(false);
        for i in 0..52 {
            report.record(format!("f{i:02}.md").into(), 1);
        }
        let out = render(&report);
        assert!(out.contains("  f49.md  (1)\n"));
        assert!(!out.contains("f50.md"));
        assert!(out.ends_with("  ...and 2 more\n"));
    }

    #[test]
    fn problems_are_listed_first() {
        let mut report = MatchReport::new(false);
        report.record_skip("x.md".into(), "permission denied");
        report.record_write_failure("y.md".into(), 3, "read-only file system");
        let out = render(&report);
        assert!(out.starts_with(
            "SKIP x.md: permission denied\nFAILED y.md (3 replacements not written): read-only file system\n"
        ));
    }
}
