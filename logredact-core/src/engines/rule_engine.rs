// logredact-core/src/engines/rule_engine.rs
//! A `SanitizationEngine` that applies an ordered list of rules to a buffer.
//!
//! Each rule runs on the output of the one before it, so a replacement made by
//! an early rule can be matched by a later one. The change count is the sum of
//! non-overlapping matches over all rules.
//! License: MIT OR APACHE 2.0

use log::debug;
use std::borrow::Cow;

use crate::config::{Rule, RuleSet};
use crate::engine::{SanitizationEngine, Sanitized};
use crate::errors::RedactResult;
use crate::redaction_match::log_rule_hit_debug;
use crate::sanitizers::compiler::{compile_rules, CompiledRules};

#[derive(Debug, Clone)]
pub struct RuleEngine {
    compiled_rules: CompiledRules,
}

impl RuleEngine {
    /// Compiles `rules` into an engine. Fails if any pattern is invalid.
    pub fn new(rules: &[Rule]) -> RedactResult<Self> {
        Ok(Self::from_compiled(compile_rules(rules)?))
    }

    /// Reuses the rules the set compiled when it was loaded.
    pub fn from_rule_set(rule_set: &RuleSet) -> Self {
        Self::from_compiled(rule_set.compiled().clone())
    }

    pub fn from_compiled(compiled_rules: CompiledRules) -> Self {
        debug!("Rule engine ready with {} rules.", compiled_rules.len());
        Self { compiled_rules }
    }
}

impl SanitizationEngine for RuleEngine {
    fn sanitize(&self, content: &str, source_id: &str) -> Sanitized {
        let mut current: Cow<'_, str> = Cow::Borrowed(content);
        let mut changes = 0usize;
        let mut rules_hit = 0usize;

        for rule in &self.compiled_rules.rules {
            let (next, n) = rule.apply(&current);
            if n == 0 {
                continue;
            }
            let next = next.into_owned();
            log_rule_hit_debug(source_id, &rule.label(), n);
            rules_hit += 1;
            changes += n;
            current = Cow::Owned(next);
        }

        debug!("{}: {} replacements from {} rules.", source_id, changes, rules_hit);
        Sanitized {
            content: current.into_owned(),
            changes,
        }
    }
}

/// Compiles `rules` and applies them to `text` in one call.
///
/// Returns the rewritten text and the total number of replacements.
pub fn apply_rules(text: &str, rules: &[Rule]) -> RedactResult<(String, usize)> {
    let engine = RuleEngine::new(rules)?;
    let out = engine.sanitize(text, "<memory>");
    Ok((out.content, out.changes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleKind;

    #[test]
    fn later_rules_see_earlier_output() {
        let rules = vec![
            Rule::new(RuleKind::Phrase, "Mr. Smith", "agent-42"),
            Rule::new(RuleKind::Regex, r"agent-\d+", "[AGENT]"),
        ];
        let (out, n) = apply_rules("Mr. Smith met Mr. Smith.", &rules).unwrap();
        assert_eq!(out, "[AGENT] met [AGENT].");
        assert_eq!(n, 4);
    }

    #[test]
    fn order_changes_counts() {
        let rules = vec![
            Rule::new(RuleKind::Regex, r"agent-\d+", "[AGENT]"),
            Rule::new(RuleKind::Phrase, "Mr. Smith", "agent-42"),
        ];
        let (out, n) = apply_rules("Mr. Smith", &rules).unwrap();
        assert_eq!(out, "agent-42");
        assert_eq!(n, 1);
    }

    #[test]
    fn rules_that_do_not_match_add_nothing() {
        let engine = RuleEngine::new(&[
            Rule::new(RuleKind::Word, "a", "b"),
            Rule::new(RuleKind::Word, "zzz", "y"),
            Rule::new(RuleKind::PhraseCi, "B", "c"),
        ])
        .unwrap();
        let out = engine.sanitize("a a", "buf");
        assert_eq!(out.content, "c c");
        assert_eq!(out.changes, 4);
    }

    #[test]
    fn engine_from_rule_set_uses_its_compiled_rules() {
        let set = RuleSet::new(
            vec![Rule::new(RuleKind::WordCi, "foo", "bar")],
            Vec::new(),
            Default::default(),
        )
        .unwrap();
        let out = RuleEngine::from_rule_set(&set).sanitize("Foo FOO food", "buf");
        assert_eq!(out.content, "bar bar food");
        assert_eq!(out.changes, 2);
    }

    #[test]
    fn no_rules_leaves_text_untouched() {
        let engine = RuleEngine::new(&[]).unwrap();
        let out = engine.sanitize("hello", "buf");
        assert_eq!(out.content, "hello");
        assert!(!out.is_changed());
    }

    #[test]
    fn phrase_ci_redacts_mixed_case() {
        let (out, n) = apply_rules(
            "the Secret word",
            &[Rule::new(RuleKind::PhraseCi, "SECRET", "[REDACTED]")],
        )
        .unwrap();
        assert_eq!(out, "the [REDACTED] word");
        assert_eq!(n, 1);
    }
}
