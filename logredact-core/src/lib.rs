// logredact-core/src/lib.rs
//! # logredact Core Library
//!
//! `logredact-core` holds the platform-independent logic for rewriting text
//! files according to an ordered list of redaction rules: loading the rule
//! set, compiling rules, applying them to a buffer, discovering the files to
//! visit, and accounting for what changed.
//!
//! ## Modules
//!
//! * `config`: `Rule`, `RuleKind`, `RuleSet` and the configuration document loader.
//! * `sanitizers`: lowers rules to compiled matchers.
//! * `engine`: the `SanitizationEngine` trait.
//! * `engines`: the ordered `RuleEngine`.
//! * `walker`: expands targets into eligible files.
//! * `runner`: read, rewrite and write back every eligible file.
//! * `report`: the `MatchReport` produced by a run.
//! * `headless`: one-shot redaction of an in-memory string.
//! * `redaction_match`: masked debug logging of matched text.
//!
//! ## Usage Example
//!
//! ```rust
//! use logredact_core::{apply_rules, Rule, RuleKind};
//!
//! let rules = vec![
//!     Rule::new(RuleKind::Word, "Foo", "Bar"),
//!     Rule::new(RuleKind::PhraseCi, "secret", "[REDACTED]"),
//! ];
//! let (out, changes) = apply_rules("Foo and Foobar keep a SECRET", &rules).unwrap();
//! assert_eq!(out, "Bar and Foobar keep a [REDACTED]");
//! assert_eq!(changes, 2);
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`RedactError`]. All of its variants describe
//! configuration problems and are raised before any file is touched.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod redaction_match;
pub mod report;
pub mod runner;
pub mod sanitizers;
pub mod walker;

/// Re-exports the configuration types and loader.
pub use config::{
    CheckConfig,
    ConfigDocument,
    DocumentFormat,
    Rule,
    RuleEntry,
    RuleKind,
    RuleSet,
    DEFAULT_CONFIG_FILE,
};

pub use errors::{RedactError, RedactResult};

pub use engine::{SanitizationEngine, Sanitized};
pub use engines::rule_engine::{apply_rules, RuleEngine};

pub use report::{FailedWrite, FileChange, FileIssue, MatchReport, LISTING_CAP};
pub use runner::{run_rule_set, FileOutcome, RunOptions, Runner};
pub use walker::{eligible_files, iter_files};

pub use headless::headless_redact_string;

pub use sanitizers::compiler::{compile_rule, compile_rules, CompiledRule, CompiledRules};
