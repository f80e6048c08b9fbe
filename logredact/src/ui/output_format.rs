//! Helpers that write themed, single-line messages.
//!
//! Colour is only applied when the caller says the stream supports it, so the
//! same functions produce plain text when output is piped or captured.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Returns `text` coloured for `entry`, or unchanged when colour is disabled.
pub fn styled(text: &str, entry: ThemeEntry, theme_map: &ThemeMap, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    match theme_map.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) => text.color(color.to_ansi_color()).to_string(),
        None => text.to_string(),
    }
}

fn print_prefixed<W: Write>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    entry: ThemeEntry,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "{}{}", styled(prefix, entry, theme_map, supports_color), msg)
}

pub fn print_info_message<W: Write>(
    writer: &mut W,
    msg: &str,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_prefixed(writer, "", msg, ThemeEntry::Info, theme_map, supports_color)
}

pub fn print_warn_message<W: Write>(
    writer: &mut W,
    msg: &str,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_prefixed(writer, "Warning: ", msg, ThemeEntry::Warn, theme_map, supports_color)
}

pub fn print_error_message<W: Write>(
    writer: &mut W,
    msg: &str,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_prefixed(writer, "Error: ", msg, ThemeEntry::Error, theme_map, supports_color)
}
