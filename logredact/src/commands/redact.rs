//! The `redact` command: load the rule set, rewrite every eligible file, and
//! print the report.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use logredact_core::{RuleSet, RunOptions, Runner};

use crate::commands::{error_msg, warn_msg};
use crate::ui::summary;
use crate::ui::theme::ThemeMap;

/// Options for a redaction run.
#[derive(Debug, Clone)]
pub struct RedactOptions {
    pub config_path: PathBuf,
    pub dry_run: bool,
}

/// Runs one redaction pass.
///
/// Configuration problems are returned as errors before any file is read.
/// Files that cannot be written are listed in the report and turn the exit
/// status into a failure; the other files are still processed.
pub fn run_redact(opts: &RedactOptions, theme_map: &ThemeMap) -> Result<ExitCode> {
    info!("Starting redaction operation.");
    let rule_set = RuleSet::load_from_file(&opts.config_path)
        .context("Failed to load rule set")?;
    debug!("Targets: {:?}", rule_set.targets);

    let report = Runner::new(&rule_set, RunOptions { dry_run: opts.dry_run }).run();

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    summary::print_report(&report, &mut stdout.lock(), theme_map, supports_color)
        .context("Failed to print report")?;

    if !report.skipped.is_empty() {
        warn_msg(format!("{} file(s) could not be read and were skipped.", report.skipped.len()), theme_map);
    }
    if report.has_failures() {
        error_msg(
            format!("{} file(s) could not be written.", report.failed_writes.len()),
            theme_map,
        );
        return Ok(ExitCode::FAILURE);
    }
    info!("Redaction operation completed.");
    Ok(ExitCode::SUCCESS)
}
