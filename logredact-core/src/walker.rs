// logredact-core/src/walker.rs
//! Expands configured targets into the files a run will visit.
//!
//! A target that is a file is yielded when its extension is eligible; a
//! directory is walked recursively with entries sorted by file name, so the
//! same tree always produces the same sequence. Targets that do not exist or
//! cannot be read are skipped. A file reachable from several targets is only
//! yielded the first time.

use log::debug;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{extension_matches, RuleSet};

/// Lazily yields eligible files for an ordered list of targets.
pub fn iter_files<'a>(
    targets: &'a [PathBuf],
    extensions: &'a BTreeSet<String>,
) -> impl Iterator<Item = PathBuf> + 'a {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    targets
        .iter()
        .flat_map(move |target| expand_target(target, extensions))
        .filter(move |path| seen.insert(identity(path)))
}

/// Convenience wrapper over [`iter_files`] for a loaded rule set.
pub fn eligible_files(rule_set: &RuleSet) -> impl Iterator<Item = PathBuf> + '_ {
    iter_files(&rule_set.targets, &rule_set.extensions)
}

fn expand_target<'a>(
    target: &'a Path,
    extensions: &'a BTreeSet<String>,
) -> Box<dyn Iterator<Item = PathBuf> + 'a> {
    if target.is_file() {
        return if extension_matches(target, extensions) {
            Box::new(std::iter::once(target.to_path_buf()))
        } else {
            debug!("Skipping target {}: extension not eligible.", target.display());
            Box::new(std::iter::empty())
        };
    }
    if !target.is_dir() {
        debug!("Skipping target {}: not found or not accessible.", target.display());
        return Box::new(std::iter::empty());
    }

    Box::new(
        WalkDir::new(target)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            // `Path::is_file` follows symlinks, matching what a plain read would see.
            .filter(|e| e.path().is_file())
            .filter(move |e| extension_matches(e.path(), extensions))
            .map(|e| e.into_path()),
    )
}

/// Key used for de-duplication: the canonical path when it can be resolved.
fn identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn exts(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walks_directories_in_sorted_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::write(root.join("c.md"), "c").unwrap();
        fs::write(root.join("a.MD"), "a").unwrap();
        fs::write(root.join("b/nested/d.html"), "d").unwrap();
        fs::write(root.join("b/skip.txt"), "x").unwrap();

        let targets = vec![root.to_path_buf()];
        let extensions = exts(&[".md", ".html"]);
        let files: Vec<PathBuf> = iter_files(&targets, &extensions).collect();
        assert_eq!(
            files,
            vec![root.join("a.MD"), root.join("b/nested/d.html"), root.join("c.md")]
        );
    }

    #[test]
    fn file_targets_are_filtered_and_order_is_preserved() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("z.md"), "").unwrap();
        fs::write(root.join("a.md"), "").unwrap();
        fs::write(root.join("n.txt"), "").unwrap();

        let targets = vec![root.join("z.md"), root.join("n.txt"), root.join("a.md")];
        let files: Vec<PathBuf> = iter_files(&targets, &exts(&[".md"])).collect();
        assert_eq!(files, vec![root.join("z.md"), root.join("a.md")]);
    }

    #[test]
    fn missing_targets_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        let targets = vec![dir.path().join("nope"), dir.path().join("a.md")];
        let files: Vec<PathBuf> = iter_files(&targets, &exts(&[".md"])).collect();
        assert_eq!(files, vec![dir.path().join("a.md")]);
    }

    #[test]
    fn overlapping_targets_yield_each_file_once() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.md"), "").unwrap();
        fs::write(root.join("b.md"), "").unwrap();

        let targets = vec![root.join("b.md"), root.to_path_buf()];
        let files: Vec<PathBuf> = iter_files(&targets, &exts(&[".md"])).collect();
        assert_eq!(files, vec![root.join("b.md"), root.join("a.md")]);
    }
}
