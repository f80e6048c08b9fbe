// logredact-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot redaction of an in-memory string,
//! without walking the filesystem or producing a report.

use crate::config::RuleSet;
use crate::engine::SanitizationEngine;
use crate::engines::rule_engine::RuleEngine;

/// Applies every rule of `rule_set` to `content`.
///
/// # Arguments
///
/// * `rule_set` - The loaded rule set, already compiled; targets and extensions are ignored.
/// * `content` - The string to be redacted.
/// * `source_id` - A stable identifier for the input, used in debug logs.
///
/// Returns the redacted text and the number of replacements made.
pub fn headless_redact_string(
    rule_set: &RuleSet,
    content: &str,
    source_id: &str,
) -> (String, usize) {
    let out = RuleEngine::from_rule_set(rule_set).sanitize(content, source_id);
    (out.content, out.changes)
}
