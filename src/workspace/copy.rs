// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Copy policies over a [`DirectoryWalk`]: mirror everything, or fill in only what is missing.

use std::fs;
use std::path::Path;

use crate::errors::WorkspaceError;
use crate::observability::messages::workspace::TemplateFileShadowed;
use crate::workspace::walk::{DirectoryWalk, NamePattern};

/// Copy every file below `source` into `target`, creating directories as needed.
///
/// Existing target files are overwritten. Returns the number of files copied.
pub fn mirror_directory(
    source: &Path,
    target: &Path,
    excludes: &[NamePattern],
) -> Result<usize, WorkspaceError> {
    let walk = DirectoryWalk::new(source).excluding(excludes.iter().cloned());
    let mut copied = 0;
    for relative in walk {
        let relative = relative.map_err(|e| WorkspaceError::io(source, e))?;
        copy_creating_directories(&source.join(&relative), &target.join(&relative))?;
        copied += 1;
    }
    Ok(copied)
}

/// Copy the files below `source` whose relative path does not exist under `target`.
///
/// Files already present in `target` always win. Returns the number of files copied.
pub fn copy_missing_files(source: &Path, target: &Path) -> Result<usize, WorkspaceError> {
    let mut copied = 0;
    for relative in DirectoryWalk::new(source) {
        let relative = relative.map_err(|e| WorkspaceError::io(source, e))?;
        let destination = target.join(&relative);
        if destination.exists() {
            tracing::debug!("{}", TemplateFileShadowed { relative: &relative });
            continue;
        }
        copy_creating_directories(&source.join(&relative), &destination)?;
        copied += 1;
    }
    Ok(copied)
}

/// Copy one file, creating the target's parent directories first.
pub fn copy_creating_directories(source: &Path, target: &Path) -> Result<(), WorkspaceError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| WorkspaceError::io(parent, e))?;
    }
    fs::copy(source, target).map_err(|e| WorkspaceError::io(source, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(root: &Path, relative: &str) -> String {
        fs::read_to_string(root.join(relative)).unwrap()
    }

    #[test]
    fn test_mirror_copies_nested_files_and_skips_excluded() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write(source.path(), "Sources/A.swift", "a");
        write(source.path(), "Resources/img/logo.png", "png");
        write(source.path(), ".build/debug/stale", "old");

        let copied =
            mirror_directory(source.path(), target.path(), &[NamePattern::new(".build")]).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(read(target.path(), "Sources/A.swift"), "a");
        assert_eq!(read(target.path(), "Resources/img/logo.png"), "png");
        assert!(!target.path().join(".build").exists());
    }

    #[test]
    fn test_copy_missing_never_overwrites() {
        let template = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write(template.path(), "Package.swift", "template manifest");
        write(template.path(), "Sources/Runtime.swift", "runtime");
        write(target.path(), "Package.swift", "user manifest");

        let copied = copy_missing_files(template.path(), target.path()).unwrap();

        assert_eq!(copied, 1);
        assert_eq!(read(target.path(), "Package.swift"), "user manifest");
        assert_eq!(read(target.path(), "Sources/Runtime.swift"), "runtime");
    }

    #[test]
    fn test_missing_source_is_reported() {
        let target = TempDir::new().unwrap();
        let result = copy_missing_files(&target.path().join("absent"), target.path());
        assert!(matches!(result, Err(WorkspaceError::Io { .. })));
    }
}
