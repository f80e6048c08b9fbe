//! This file defines the command-line interface (CLI) for the logredact
//! application, including all available commands and their arguments.
//!
//! Running `logredact` without a subcommand performs a redaction pass, so the
//! common invocations are `logredact` and `logredact --dry-run`.

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "logredact",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rewrite files in place according to ordered redaction rules",
    long_about = "logredact reads a list of redaction rules (words, phrases and regular expressions, each with a case-insensitive variant) from a configuration document, applies them in order to every eligible file under the configured targets, and rewrites the files in place. Use --dry-run to see what would change without writing anything."
)]
pub struct Cli {
    /// Suppress all log output.
    #[arg(long, short = 'q', global = true, help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to the configuration document (JSON, or YAML by extension).
    #[arg(
        long = "config",
        short = 'c',
        value_name = "FILE",
        env = "LOGREDACT_CONFIG",
        global = true,
        help = "Path to the configuration document [default: redactions.json]."
    )]
    pub config: Option<PathBuf>,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    #[command(flatten)]
    pub redact: RedactCommand,

    /// The subcommand to run; defaults to `redact`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Rejects a top-level `--dry-run` combined with a command that does not redact.
    pub fn validate(&self) -> Result<(), clap::Error> {
        match self.command {
            Some(Commands::Render(_) | Commands::Check(_)) if self.redact.dry_run => Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--dry-run only applies to redaction and cannot be combined with `render` or `check`",
            )),
            _ => Ok(()),
        }
    }
}

/// All available commands for the `logredact` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Applies the configured rules to every eligible target file.
    #[command(about = "Apply the configured rules to every eligible target file (default).")]
    Redact(RedactCommand),

    /// Converts Markdown documents to HTML pages using a template.
    #[command(about = "Convert .md documents in a directory to .html pages using a template.")]
    Render(RenderCommand),

    /// Scans generated HTML pages for structure and leftover sensitive text.
    #[command(about = "Scan generated .html pages for required structure and banned content.")]
    Check(CheckCommand),
}

/// Arguments for the `redact` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RedactCommand {
    /// Report what would change without writing any file.
    #[arg(long = "dry-run", visible_alias = "preview", help = "Report what would change without writing any file.")]
    pub dry_run: bool,
}

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Directory holding the `.md` documents.
    #[arg(value_name = "DIR", help = "Directory holding the .md documents.")]
    pub dir: PathBuf,

    /// HTML template containing the content markers.
    #[arg(long, short = 't', value_name = "FILE", help = "HTML template containing the content markers.")]
    pub template: PathBuf,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Directory holding the `.html` pages to scan.
    #[arg(value_name = "DIR", help = "Directory holding the .html pages to scan.")]
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_is_a_write_run() {
        let cli = Cli::try_parse_from(["logredact"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.redact.dry_run);
    }

    #[test]
    fn preview_alias_sets_dry_run() {
        let cli = Cli::try_parse_from(["logredact", "--preview"]).unwrap();
        assert!(cli.redact.dry_run);
        let cli = Cli::try_parse_from(["logredact", "redact", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Redact(RedactCommand { dry_run: true }))));
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["logredact", "check", "out", "--config", "r.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("r.yaml")));
        assert!(matches!(cli.command, Some(Commands::Check(_))));
    }

    #[test]
    fn dry_run_is_rejected_for_non_redacting_commands() {
        let cli = Cli::try_parse_from(["logredact", "--dry-run", "check", "out"]).unwrap();
        assert_eq!(cli.validate().unwrap_err().kind(), ErrorKind::ArgumentConflict);
        let cli = Cli::try_parse_from(["logredact", "--preview", "render", "out", "-t", "t.html"]).unwrap();
        assert!(cli.validate().is_err());
        let cli = Cli::try_parse_from(["logredact", "--dry-run", "redact"]).unwrap();
        assert!(cli.validate().is_ok());
        let cli = Cli::try_parse_from(["logredact", "check", "out"]).unwrap();
        assert!(cli.validate().is_ok());
    }
}
