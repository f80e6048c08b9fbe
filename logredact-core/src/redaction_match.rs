// logredact-core/src/redaction_match.rs
//! Debug logging helpers for matched text.
//!
//! Matched text is exactly what the user wants gone, so it is masked in logs
//! unless `LOGREDACT_ALLOW_DEBUG_PII=true` is set.

use log::debug;
use once_cell::sync::Lazy;

static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("LOGREDACT_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_captured_match_debug(rule_label: &str, original_sensitive_content: &str) {
    debug!(
        "Captured match for rule '{}' (original): '{}'",
        rule_label,
        get_loggable_content(original_sensitive_content)
    );
}

pub fn log_rule_hit_debug(source_id: &str, rule_label: &str, occurrences: usize) {
    debug!("{}: rule '{}' replaced {} occurrence(s)", source_id, rule_label, occurrences);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }
}
