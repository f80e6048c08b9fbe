//! The `render` command: turn Markdown documents into HTML pages by placing
//! their escaped text between two markers of a template page.
//!
//! A document whose `.html` sibling already exists is left alone, so
//! hand-made pages are never overwritten.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::commands::info_msg;
use crate::ui::theme::ThemeMap;

pub const START_MARKER: &str = "<!-- TM_LOG_CONTENT -->";
pub const END_MARKER: &str = "<!-- /TM_LOG_CONTENT -->";

static MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([^"]+)\.md""#).expect("static regex is valid"));

/// Escapes the three characters that would otherwise be read as markup.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// A template split around its content markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Everything up to and including the start marker.
    head: String,
    /// Everything from the end marker on.
    tail: String,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self> {
        let start = text.find(START_MARKER);
        let end = text.find(END_MARKER);
        match (start, end) {
            (Some(start), Some(end)) if end > start => Ok(Self {
                head: text[..start + START_MARKER.len()].to_string(),
                tail: text[end..].to_string(),
            }),
            _ => bail!("Template markers not found. Put {START_MARKER} ... {END_MARKER} inside the <pre> of the template."),
        }
    }

    /// Places `body` (already escaped) between the markers.
    pub fn render(&self, body: &str) -> String {
        format!("{}\n{}\n{}", self.head, body, self.tail)
    }
}

/// Rewrites `href="x.md"` links to `href="x.html"`.
pub fn rewrite_md_links(html: &str) -> Cow<'_, str> {
    MD_LINK.replace_all(html, r#"href="$1.html""#)
}

fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    Ok(files)
}

/// Converts every `.md` file in `dir` that has no `.html` counterpart yet.
///
/// Returns the number of pages written.
pub fn render_directory(dir: &Path, template_path: &Path) -> Result<usize> {
    let template_text = fs::read_to_string(template_path)
        .with_context(|| format!("Template not found: {}", template_path.display()))?;
    let template = Template::parse(&template_text)
        .with_context(|| format!("Invalid template {}", template_path.display()))?;

    let md_files = markdown_files(dir)?;
    if md_files.is_empty() {
        bail!("No .md files found in {}", dir.display());
    }

    let mut converted = 0usize;
    for md_path in md_files {
        let out_path = md_path.with_extension("html");
        if out_path.exists() {
            debug!("Keeping existing {}", out_path.display());
            continue;
        }
        let raw = fs::read_to_string(&md_path)
            .with_context(|| format!("Failed to read {}", md_path.display()))?
            .replace("\r\n", "\n");
        fs::write(&out_path, template.render(&escape_html(&raw)))
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        debug!("Rendered {} -> {}", md_path.display(), out_path.display());
        converted += 1;
    }
    Ok(converted)
}

/// Rewrites Markdown links in `dir/index.html`, if it exists. Returns its path when updated.
pub fn update_index_links(dir: &Path) -> Result<Option<PathBuf>> {
    let index_path = dir.join("index.html");
    if !index_path.exists() {
        return Ok(None);
    }
    let index = fs::read_to_string(&index_path)
        .with_context(|| format!("Failed to read {}", index_path.display()))?;
    fs::write(&index_path, rewrite_md_links(&index).as_ref())
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    Ok(Some(index_path))
}

pub fn run_render(dir: &Path, template_path: &Path, theme_map: &ThemeMap) -> Result<ExitCode> {
    info!("Rendering Markdown documents in {}", dir.display());
    let converted = render_directory(dir, template_path)?;
    println!("Converted {} .md files to .html", converted);

    if let Some(index_path) = update_index_links(dir)? {
        info_msg(format!("Updated links in {}", index_path.display()), theme_map);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TEMPLATE: &str = "<html><pre class=\"log-pre\"><!-- TM_LOG_CONTENT -->\nold\n<!-- /TM_LOG_CONTENT --></pre></html>";

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn template_requires_ordered_markers() {
        assert!(Template::parse(TEMPLATE).is_ok());
        assert!(Template::parse("<pre></pre>").is_err());
        assert!(Template::parse("<!-- /TM_LOG_CONTENT --> <!-- TM_LOG_CONTENT -->").is_err());
    }

    #[test]
    fn render_replaces_content_between_markers() {
        let template = Template::parse(TEMPLATE).unwrap();
        assert_eq!(
            template.render("new"),
            "<html><pre class=\"log-pre\"><!-- TM_LOG_CONTENT -->\nnew\n<!-- /TM_LOG_CONTENT --></pre></html>"
        );
    }

    #[test]
    fn md_links_become_html_links() {
        assert_eq!(
            rewrite_md_links(r#"<a href="01-02-2025.md">x</a> <a href="a.mdx">y</a>"#),
            r#"<a href="01-02-2025.html">x</a> <a href="a.mdx">y</a>"#
        );
    }

    #[test]
    fn renders_only_missing_pages() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("template.tpl");
        fs::write(&template_path, TEMPLATE).unwrap();
        fs::write(dir.path().join("a.md"), "x < y\r\nz").unwrap();
        fs::write(dir.path().join("b.md"), "keep").unwrap();
        fs::write(dir.path().join("b.html"), "hand-made").unwrap();

        let converted = render_directory(dir.path(), &template_path).unwrap();
        assert_eq!(converted, 1);
        let page = fs::read_to_string(dir.path().join("a.html")).unwrap();
        assert!(page.contains("-->\nx &lt; y\nz\n<!--"));
        assert_eq!(fs::read_to_string(dir.path().join("b.html")).unwrap(), "hand-made");
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("t.tpl");
        fs::write(&template_path, TEMPLATE).unwrap();
        let err = render_directory(dir.path(), &template_path).unwrap_err();
        assert!(err.to_string().starts_with("No .md files found"));
    }
}
