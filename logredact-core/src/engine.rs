// logredact-core/src/engine.rs
//! Defines the core `SanitizationEngine` trait and the data it reports.
//!
//! The trait keeps the runner independent of how rules are matched. The
//! shipped implementation is [`RuleEngine`](crate::engines::rule_engine::RuleEngine),
//! which applies an ordered rule list to one text buffer at a time.
//!
//! License: MIT OR APACHE 2.0

/// Result of running every rule over one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub content: String,
    /// Total replacements across all rules.
    pub changes: usize,
}

impl Sanitized {
    pub fn is_changed(&self) -> bool {
        self.changes > 0
    }
}

/// A pluggable text sanitizer.
pub trait SanitizationEngine {
    /// Applies every rule to `content` in order and returns the rewritten
    /// text with its change count.
    ///
    /// `source_id` names the buffer (usually a file path) for logging only.
    fn sanitize(&self, content: &str, source_id: &str) -> Sanitized;
}
