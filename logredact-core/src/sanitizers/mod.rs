//! Rule compilation for the redaction engine.
//!
//! Declarative [`Rule`](crate::config::Rule)s are lowered to regular
//! expressions once per run, so the per-file work in the engine is only
//! matching and substitution.

pub mod compiler;
