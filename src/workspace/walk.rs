// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lazy recursive directory walk yielding file paths relative to the walk root.
//!
//! The walk knows nothing about copying; the mirror and fill-missing policies in
//! [`crate::workspace::copy`] are consumers of it.

use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

/// A file-name pattern where `*` matches any run of characters, including none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern(String);

impl NamePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn matches(&self, name: &str) -> bool {
        wildcard_match(self.0.as_bytes(), name.as_bytes())
    }
}

impl From<&str> for NamePattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

fn wildcard_match(pattern: &[u8], name: &[u8]) -> bool {
    let (mut p, mut n) = (0, 0);
    // Position of the last `*` seen and the name position it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, n));
            p += 1;
        } else if p < pattern.len() && pattern[p] == name[n] {
            p += 1;
            n += 1;
        } else if let Some((star, tried)) = backtrack {
            p = star + 1;
            n = tried + 1;
            backtrack = Some((star, tried + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|b| *b == b'*')
}

/// Iterator over the regular files below a root, depth first.
///
/// Directories whose name matches an exclusion pattern are not descended into; files whose
/// name matches are skipped. Symlinks are followed the way `fs::metadata` follows them.
pub struct DirectoryWalk {
    root: PathBuf,
    excludes: Vec<NamePattern>,
    pending: Vec<(ReadDir, PathBuf)>,
    started: bool,
}

impl DirectoryWalk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excludes: Vec::new(),
            pending: Vec::new(),
            started: false,
        }
    }

    pub fn excluding<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<NamePattern>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excludes.iter().any(|pattern| pattern.matches(name))
    }
}

impl Iterator for DirectoryWalk {
    type Item = io::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            match fs::read_dir(&self.root) {
                Ok(entries) => self.pending.push((entries, PathBuf::new())),
                Err(e) => return Some(Err(e)),
            }
        }

        loop {
            let (entries, prefix) = self.pending.last_mut()?;
            let entry = match entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.pending.pop();
                    continue;
                }
            };

            let name = entry.file_name();
            let relative = prefix.join(&name);
            if self.is_excluded(&name.to_string_lossy()) {
                continue;
            }

            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => return Some(Err(e)),
            };
            if metadata.is_dir() {
                match fs::read_dir(entry.path()) {
                    Ok(children) => self.pending.push((children, relative)),
                    Err(e) => return Some(Err(e)),
                }
            } else {
                return Some(Ok(relative));
            }
        }
    }
}
