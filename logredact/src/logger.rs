//! Logging setup for the `logredact` binary.
//!
//! Logs go to stderr through `env_logger` so they never mix with the report
//! on stdout. `RUST_LOG` is honoured unless an explicit level is passed.

use log::LevelFilter;
use std::io::Write;

/// Default filter when neither `RUST_LOG` nor a flag selects a level.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global logger. Calling it more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format(|buf, record| {
        writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
    });
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to an explicit level.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
