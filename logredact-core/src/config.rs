//! Configuration management for `logredact-core`.
//!
//! This module defines the on-disk configuration document, the validated
//! [`Rule`] and [`RuleSet`] types built from it, and the loader that turns one
//! into the other. Documents are JSON by default; files ending in `.yaml` or
//! `.yml` are parsed as YAML.
//!
//! Rule order is significant and is preserved exactly as written: each rule
//! sees the output of the rules before it.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::{RedactError, RedactResult};
use crate::sanitizers::compiler::{compile_rules, CompiledRules};

/// File name looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "redactions.json";

/// Target used when the document does not list any.
pub const DEFAULT_TARGET: &str = "logs";

/// Extensions used when the document does not list any.
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".md", ".html"];

/// The closed set of rule kinds.
///
/// Word and phrase kinds match their source literally; regex kinds interpret
/// it as a regular expression. Each family has a case-insensitive `_ci` twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Word,
    WordCi,
    Phrase,
    PhraseCi,
    Regex,
    RegexCi,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Word,
        RuleKind::WordCi,
        RuleKind::Phrase,
        RuleKind::PhraseCi,
        RuleKind::Regex,
        RuleKind::RegexCi,
    ];

    /// The name used for this kind in configuration documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Word => "word",
            RuleKind::WordCi => "word_ci",
            RuleKind::Phrase => "phrase",
            RuleKind::PhraseCi => "phrase_ci",
            RuleKind::Regex => "regex",
            RuleKind::RegexCi => "regex_ci",
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, RuleKind::WordCi | RuleKind::PhraseCi | RuleKind::RegexCi)
    }

    /// True for kinds whose source is a regular expression rather than a literal.
    pub fn is_pattern(&self) -> bool {
        matches!(self, RuleKind::Regex | RuleKind::RegexCi)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name one of the six rule kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRuleKindError(pub String);

impl fmt::Display for ParseRuleKindError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Unknown rule type '{}'; expected one of: word, word_ci, phrase, phrase_ci, regex, regex_ci.",
            self.0
        )
    }
}

impl std::error::Error for ParseRuleKindError {}

impl FromStr for RuleKind {
    type Err = ParseRuleKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseRuleKindError(s.to_string()))
    }
}

/// A single validated substitution directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    /// The literal or pattern to match. `None` or empty makes the rule a no-op.
    pub source: Option<String>,
    /// Text substituted for every match.
    pub replacement: String,
}

impl Rule {
    pub fn new(kind: RuleKind, source: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            kind,
            source: Some(source.into()),
            replacement: replacement.into(),
        }
    }

    /// Returns the source only when it is present and non-empty.
    pub fn effective_source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }
}

/// A rule entry exactly as it appears in the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl RuleEntry {
    /// Converts the raw entry into a [`Rule`].
    ///
    /// Literal kinds read `from` and regex kinds read `pattern`; the other
    /// field is ignored, so a rule without its own field is a no-op.
    /// `position` is 1-based and only used for error reporting.
    pub fn into_rule(self, position: usize) -> RedactResult<Rule> {
        let kind: RuleKind = self.kind.parse().map_err(|_| RedactError::UnknownRuleKind {
            index: position,
            kind: self.kind.clone(),
        })?;
        let source = if kind.is_pattern() { self.pattern } else { self.from };
        Ok(Rule {
            kind,
            source,
            replacement: self.to.unwrap_or_default(),
        })
    }
}

/// A banned regular expression for the `check` command, with the label shown on a hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BannedPattern {
    pub pattern: String,
    pub label: String,
}

impl BannedPattern {
    fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }
}

/// Settings for the `check` sanity scanner, read from the `check` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Substrings every scanned file must contain.
    pub required_substrings: Vec<String>,
    /// Class name the `<pre>` marker element must carry.
    pub marker_class: String,
    /// Literals that must not appear (whole-word, case-insensitive).
    pub banned_literals: Vec<String>,
    /// Regular expressions that must not match.
    pub banned_patterns: Vec<BannedPattern>,
    /// Optional regex a file name must match to be scanned.
    pub file_pattern: Option<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            required_substrings: vec!["<!DOCTYPE html>".to_string()],
            marker_class: "log-pre".to_string(),
            banned_literals: Vec::new(),
            banned_patterns: vec![
                BannedPattern::new(r"file-service://file-[A-Za-z0-9]+", "file-service pointer"),
                BannedPattern::new(
                    r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                    "email address",
                ),
                BannedPattern::new(
                    r"\b(?:\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b",
                    "phone number",
                ),
                BannedPattern::new(r"(?i)[A-Z]:\\Users\\[^\\]+\\", "Windows user path"),
                BannedPattern::new(r"(?i)/Users/[^/]+/", "macOS user path"),
            ],
            file_pattern: None,
        }
    }
}

fn default_targets() -> Vec<String> {
    vec![DEFAULT_TARGET.to_string()]
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

/// The configuration document as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub check: CheckConfig,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            targets: default_targets(),
            extensions: default_extensions(),
            check: CheckConfig::default(),
        }
    }
}

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

impl ConfigDocument {
    /// Reads and parses a configuration document. A missing file is fatal.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RedactResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RedactError::ConfigNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| RedactError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, DocumentFormat::from_path(path), path)
    }

    /// Parses document text. `origin` only appears in error messages.
    pub fn parse(text: &str, format: DocumentFormat, origin: &Path) -> RedactResult<Self> {
        let parsed = match format {
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yml::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| RedactError::ConfigParse {
            path: origin.to_path_buf(),
            message,
        })
    }
}

/// Lowercases an extension and makes sure it starts with a dot.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    Some(if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    })
}

/// An ordered, validated rule set plus the files it applies to.
///
/// Rules are compiled once, when the set is built, and the set is never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    compiled: CompiledRules,
    pub targets: Vec<PathBuf>,
    /// Normalised suffixes, e.g. `.md`.
    pub extensions: BTreeSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            compiled: CompiledRules::default(),
            targets: default_targets().into_iter().map(PathBuf::from).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RuleSet {
    /// Compiles `rules` and pairs them with the files they apply to.
    ///
    /// Fails on the first pattern that does not compile.
    pub fn new(rules: Vec<Rule>, targets: Vec<PathBuf>, extensions: BTreeSet<String>) -> RedactResult<Self> {
        let compiled = compile_rules(&rules)?;
        Ok(Self {
            rules,
            compiled,
            targets,
            extensions,
        })
    }

    /// Loads, validates and compiles a rule set from a configuration file.
    ///
    /// Fails on a missing file, a malformed document, an unknown rule kind, or
    /// a pattern that does not compile.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RedactResult<Self> {
        let path = path.as_ref();
        info!("Loading redaction rules from: {}", path.display());
        let document = ConfigDocument::load_from_file(path)?;
        let rule_set = Self::from_document(document)?;
        info!(
            "Loaded {} rules, {} targets from {}.",
            rule_set.rules.len(),
            rule_set.targets.len(),
            path.display()
        );
        Ok(rule_set)
    }

    /// Builds a rule set from an already parsed document.
    pub fn from_document(document: ConfigDocument) -> RedactResult<Self> {
        let rules = document
            .rules
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_rule(i + 1))
            .collect::<RedactResult<Vec<Rule>>>()?;

        let extensions: BTreeSet<String> = document
            .extensions
            .iter()
            .filter_map(|e| normalize_extension(e))
            .collect();
        debug!("Eligible extensions: {:?}", extensions);

        Self::new(
            rules,
            document.targets.into_iter().map(PathBuf::from).collect(),
            extensions,
        )
    }

    /// The rules in document order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The compiled form of [`rules`](Self::rules), in the same order.
    pub fn compiled(&self) -> &CompiledRules {
        &self.compiled
    }

    /// Returns true when `path` carries one of the eligible extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        extension_matches(path, &self.extensions)
    }
}

/// Case-insensitive suffix check against a set of normalised extensions.
pub fn extension_matches(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .is_some_and(|suffix| extensions.contains(&suffix))
}
