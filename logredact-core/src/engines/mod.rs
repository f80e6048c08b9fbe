//! Concrete implementations of the [`SanitizationEngine`](crate::engine::SanitizationEngine) trait.

pub mod rule_engine;
