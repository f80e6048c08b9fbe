//! Terminal output: colours, message helpers and the run summary.

pub mod output_format;
pub mod summary;
pub mod theme;
