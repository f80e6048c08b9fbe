//! compiler.rs - Turns declarative rules into ready-to-run matchers.
//!
//! Every rule kind is lowered to a single [`Regex`]: word kinds wrap the
//! escaped literal in `\b` anchors, phrase kinds use the escaped literal as-is,
//! and regex kinds use the source unchanged. The `_ci` kinds set the
//! case-insensitive flag. Rules with an empty source compile to a no-op.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, log_enabled, warn, Level};
use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;

use crate::config::{Rule, RuleKind};
use crate::errors::{RedactError, RedactResult};
use crate::redaction_match::log_captured_match_debug;

/// Upper bound on the compiled size of a single rule's regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

static GROUP_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(?:(\d+)|\{(\d+)\})").expect("static regex is valid"));

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// 1-based position of the rule in its rule set.
    pub position: usize,
    pub kind: RuleKind,
    /// `None` when the rule has no source and therefore never matches.
    pub regex: Option<Regex>,
    pub replacement: String,
}

impl CompiledRule {
    /// Short human-readable name that does not reveal the matched text.
    pub fn label(&self) -> String {
        format!("#{} {}", self.position, self.kind)
    }

    pub fn is_noop(&self) -> bool {
        self.regex.is_none()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Replaces every non-overlapping match and returns the new text with the
    /// number of replacements made.
    ///
    /// Literal kinds insert the replacement verbatim; regex kinds expand
    /// `$1`/`${name}` references against each match.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let Some(regex) = &self.regex else {
            return (Cow::Borrowed(text), 0);
        };
        let mut count = 0usize;
        let label = log_enabled!(Level::Debug).then(|| self.label());
        let mut record = |caps: &Captures| {
            count += 1;
            if let (Some(label), Some(m)) = (&label, caps.get(0)) {
                log_captured_match_debug(label, m.as_str());
            }
        };
        let replaced = if self.kind.is_pattern() {
            regex.replace_all(text, |caps: &Captures| {
                record(caps);
                let mut dst = String::new();
                caps.expand(&self.replacement, &mut dst);
                dst
            })
        } else {
            regex.replace_all(text, |caps: &Captures| {
                record(caps);
                self.replacement.as_str()
            })
        };
        (replaced, count)
    }
}

/// An ordered collection of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

impl CompiledRules {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builds the regex source for a rule, or `None` for a no-op rule.
fn pattern_for(rule: &Rule) -> Option<String> {
    let source = rule.effective_source()?;
    Some(match rule.kind {
        RuleKind::Word | RuleKind::WordCi => format!(r"\b{}\b", regex::escape(source)),
        RuleKind::Phrase | RuleKind::PhraseCi => regex::escape(source),
        RuleKind::Regex | RuleKind::RegexCi => source.to_string(),
    })
}

/// Warns when a regex replacement refers to a numbered group the pattern lacks.
fn check_group_references(compiled: &CompiledRule, regex: &Regex) {
    let groups = regex.captures_len().saturating_sub(1);
    for cap in GROUP_REFERENCE.captures_iter(&compiled.replacement) {
        let number = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str());
        if let Some(Ok(n)) = number.map(str::parse::<usize>) {
            if n > groups {
                warn!(
                    "Rule {}: replacement references non-existent capture group '${}'.",
                    compiled.label(),
                    n
                );
            }
        }
    }
}

/// Compiles one rule. `position` is 1-based.
pub fn compile_rule(rule: &Rule, position: usize) -> RedactResult<CompiledRule> {
    let mut compiled = CompiledRule {
        position,
        kind: rule.kind,
        regex: None,
        replacement: rule.replacement.clone(),
    };

    let Some(pattern) = pattern_for(rule) else {
        debug!("Rule {} has no source; it will be skipped.", compiled.label());
        return Ok(compiled);
    };

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(rule.kind.is_case_insensitive())
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|source| RedactError::RuleCompilation {
            index: position,
            label: rule.kind.to_string(),
            source,
        })?;

    if rule.kind.is_pattern() {
        check_group_references(&compiled, &regex);
    }
    log::debug!(
        target: "logredact_core::sanitizer",
        "Rule {} compiled successfully.",
        compiled.label()
    );
    compiled.regex = Some(regex);
    Ok(compiled)
}

/// Compiles rules in order. The first rule that fails to compile aborts the whole set.
pub fn compile_rules(rules: &[Rule]) -> RedactResult<CompiledRules> {
    debug!("Starting compilation of {} rules.", rules.len());
    let compiled = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| compile_rule(rule, i + 1))
        .collect::<RedactResult<Vec<_>>>()?;
    debug!("Finished compiling rules. Total compiled: {}.", compiled.len());
    Ok(CompiledRules { rules: compiled })
}
