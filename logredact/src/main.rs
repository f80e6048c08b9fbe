// logredact/src/main.rs
//! logredact entry point.
//!
//! Parses the command line, installs the logger and theme, and dispatches to
//! the selected command. Running without a subcommand performs a redaction.

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use logredact::cli::{Cli, Commands};
use logredact::commands::check::run_check;
use logredact::commands::redact::{run_redact, RedactOptions};
use logredact::commands::render::run_render;
use logredact::commands::{error_msg, info_msg};
use logredact::logger;
use logredact::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};
use logredact_core::config::{CheckConfig, ConfigDocument};
use logredact_core::DEFAULT_CONFIG_FILE;

/// Exit status for fatal configuration and usage errors.
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));
    debug!("logredact started. Version: {}", env!("CARGO_PKG_VERSION"));

    let theme_map = match build_theme_map(cli.theme.as_ref()) {
        Ok(map) => map,
        Err(e) => {
            let fallback = ThemeStyle::default_theme_map();
            error_msg(format!("{:#}", e), &fallback);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    match dispatch(cli, &theme_map) {
        Ok(code) => code,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme_map);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn dispatch(cli: Cli, theme_map: &ThemeMap) -> Result<ExitCode> {
    match cli.command {
        None => {
            let opts = RedactOptions {
                config_path: config_path(cli.config),
                dry_run: cli.redact.dry_run,
            };
            run_redact(&opts, theme_map)
        }
        Some(Commands::Redact(cmd)) => {
            let opts = RedactOptions {
                config_path: config_path(cli.config),
                dry_run: cli.redact.dry_run || cmd.dry_run,
            };
            run_redact(&opts, theme_map)
        }
        Some(Commands::Render(cmd)) => run_render(&cmd.dir, &cmd.template, theme_map),
        Some(Commands::Check(cmd)) => {
            let check_config = load_check_config(cli.config.as_deref(), theme_map)?;
            run_check(&cmd.dir, &check_config, theme_map)
        }
    }
}

fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// An explicit config path must exist; the implicit default may be absent.
fn load_check_config(explicit: Option<&Path>, theme_map: &ThemeMap) -> Result<CheckConfig> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
        None => {
            info_msg("No configuration document found; using default check settings.", theme_map);
            return Ok(CheckConfig::default());
        }
    };
    let document = ConfigDocument::load_from_file(path)
        .with_context(|| format!("Failed to load check settings from {}", path.display()))?;
    Ok(document.check)
}
