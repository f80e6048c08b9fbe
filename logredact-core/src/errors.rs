//! errors.rs - Custom error types for the logredact-core library.
//!
//! Every variant here is fatal for a run: they are raised while the rule set
//! is being loaded and compiled, before any target file is read or written.
//! Per-file I/O problems are not errors of the library; the runner records
//! them in the [`MatchReport`](crate::report::MatchReport) instead.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// All error types produced by the `logredact-core` library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactError {
    #[error("Missing {0}. Create it first.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown rule type: {kind} (rule #{index})")]
    UnknownRuleKind { index: usize, kind: String },

    #[error("Failed to compile rule #{index} ({label}): {source}")]
    RuleCompilation {
        index: usize,
        label: String,
        #[source]
        source: regex::Error,
    },
}

/// Convenience alias used throughout the core crate.
pub type RedactResult<T> = Result<T, RedactError>;
