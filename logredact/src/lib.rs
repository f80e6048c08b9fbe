// logredact/src/lib.rs
//! # logredact CLI Application
//!
//! This crate provides the command-line front end of the logredact redaction
//! engine: argument parsing, logging setup, the `redact`, `render` and
//! `check` commands, and themed terminal output.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
