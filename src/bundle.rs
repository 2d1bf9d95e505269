// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Locating a playground bundle from the file a user has open.

use std::path::{Path, PathBuf};

use crate::config::consts::BUNDLE_SUFFIX;

/// A user's source bundle: the directory that gets mirrored, plus its designated entry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    root: PathBuf,
    entry: PathBuf,
}

impl SourceBundle {
    pub fn new(root: impl Into<PathBuf>, entry: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entry: entry.into(),
        }
    }

    /// Bundle for an entry file: the nearest enclosing `.playground` directory, or the entry's
    /// parent directory when it does not live in one.
    pub fn from_entry(entry: impl Into<PathBuf>) -> Self {
        let entry = entry.into();
        let root = entry
            .parent()
            .and_then(|parent| find_bundle_root(parent, BUNDLE_SUFFIX))
            .or_else(|| entry.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        Self { root, entry }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }
}

/// Nearest ancestor of `path` (including `path` itself) whose file name ends with `suffix`.
pub fn find_bundle_root(path: &Path, suffix: &str) -> Option<PathBuf> {
    path.ancestors()
        .find(|ancestor| {
            ancestor
                .file_name()
                .map(|name| name.to_string_lossy().ends_with(suffix))
                .unwrap_or(false)
        })
        .map(Path::to_path_buf)
}

/// `path` with its extension replaced (or added) by `extension`.
pub fn sibling_with_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_bundle_root() {
        let cases: [(&str, Option<&str>); 5] = [
            ("foo/bar.playground/blah", Some("foo/bar.playground")),
            (
                "foo/bar.playground/blah/bleep/bloop.swift",
                Some("foo/bar.playground"),
            ),
            ("foo/bar/blah", None),
            ("", None),
            ("/", None),
        ];

        for (path, expected) in cases {
            let result = find_bundle_root(Path::new(path), BUNDLE_SUFFIX);
            assert_eq!(
                result,
                expected.map(PathBuf::from),
                "bundle root of '{}'",
                path
            );
        }
    }

    #[test]
    fn test_innermost_bundle_wins() {
        let result = find_bundle_root(Path::new("a.playground/b.playground/c"), BUNDLE_SUFFIX);
        assert_eq!(result, Some(PathBuf::from("a.playground/b.playground")));
    }

    #[test]
    fn test_bundle_from_entry() {
        let bundle = SourceBundle::from_entry("/work/Demo.playground/Contents.swift");
        assert_eq!(bundle.root(), Path::new("/work/Demo.playground"));
        assert_eq!(bundle.entry(), Path::new("/work/Demo.playground/Contents.swift"));

        let loose = SourceBundle::from_entry("/work/scripts/main.swift");
        assert_eq!(loose.root(), Path::new("/work/scripts"));
    }

    #[test]
    fn test_sibling_with_extension() {
        assert_eq!(
            sibling_with_extension(Path::new("a/Demo.playground/Contents.swift"), "expectation"),
            PathBuf::from("a/Demo.playground/Contents.expectation")
        );
    }
}
