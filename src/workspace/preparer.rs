// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Materializes a self-contained, buildable scratch directory from a source bundle and a
//! template overlay.
//!
//! ## Policy
//!
//! 1. The scratch directory is keyed by a hash of the entry file's path (not its contents), so
//!    runs of the same file reuse the same location while two files sharing a bundle directory
//!    never share one. It is deleted and recreated on every call.
//! 2. Every bundle file is mirrored, except subtrees matching the exclusion patterns.
//! 3. The entry file is copied to `<sources_dir>/<main_file>`. A bundle that already ships that
//!    file is a structural conflict.
//! 4. Template files are merged in only where the relative path is still free. User files win.
//!
//! Two preparations of the same bundle are not serialized here; see
//! [`crate::session::SessionRegistry`] for the per-file guard.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bundle::SourceBundle;
use crate::config::consts::WORKSPACE_PREFIX;
use crate::config::WorkspaceConfig;
use crate::errors::WorkspaceError;
use crate::observability::messages::workspace::WorkspacePrepared;
use crate::observability::messages::StructuredLog;
use crate::workspace::copy::{copy_creating_directories, copy_missing_files, mirror_directory};
use crate::workspace::walk::NamePattern;

/// Result of a successful preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedWorkspace {
    /// Scratch directory root
    pub root: PathBuf,
    /// Where the entry file was placed
    pub main_file: PathBuf,
    /// Bundle files mirrored
    pub mirrored: usize,
    /// Template files merged in
    pub overlaid: usize,
}

/// Stable directory name for an entry file: prefix plus the hex SHA-256 of its path.
pub fn workspace_key(entry: &Path) -> String {
    let digest = Sha256::digest(entry.to_string_lossy().as_bytes());
    format!("{}{}", WORKSPACE_PREFIX, hex::encode(digest))
}

/// Builds scratch workspaces under a storage root.
#[derive(Debug, Clone)]
pub struct WorkspacePreparer {
    storage_root: PathBuf,
    layout: WorkspaceConfig,
    excludes: Vec<NamePattern>,
}

impl WorkspacePreparer {
    pub fn new(storage_root: impl Into<PathBuf>, layout: WorkspaceConfig) -> Self {
        let excludes = layout
            .exclude
            .iter()
            .map(|pattern| NamePattern::new(pattern.as_str()))
            .collect();
        Self {
            storage_root: storage_root.into(),
            layout,
            excludes,
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Scratch directory used for a bundle's entry file. Does not touch the filesystem.
    pub fn scratch_path(&self, bundle: &SourceBundle) -> PathBuf {
        self.storage_root.join(workspace_key(bundle.entry()))
    }

    /// Rebuild the scratch workspace for `bundle`, overlaying `template`.
    pub fn prepare(
        &self,
        bundle: &SourceBundle,
        template: &Path,
    ) -> Result<PreparedWorkspace, WorkspaceError> {
        if !bundle.entry().is_file() {
            return Err(WorkspaceError::MissingEntry {
                path: bundle.entry().to_path_buf(),
            });
        }
        if !template.is_dir() {
            return Err(WorkspaceError::MissingTemplate {
                path: template.to_path_buf(),
            });
        }

        let scratch = self.scratch_path(bundle);
        if scratch.exists() {
            fs::remove_dir_all(&scratch).map_err(|e| WorkspaceError::io(&scratch, e))?;
        }
        fs::create_dir_all(&scratch).map_err(|e| WorkspaceError::io(&scratch, e))?;

        let mirrored = mirror_directory(bundle.root(), &scratch, &self.excludes)?;

        let main_file = scratch
            .join(&self.layout.sources_dir)
            .join(&self.layout.main_file);
        if main_file.exists() {
            return Err(WorkspaceError::EntryConflict { path: main_file });
        }
        copy_creating_directories(bundle.entry(), &main_file)?;

        let overlaid = copy_missing_files(template, &scratch)?;

        WorkspacePrepared {
            scratch: &scratch,
            mirrored,
            overlaid,
        }
        .log();

        Ok(PreparedWorkspace {
            root: scratch,
            main_file,
            mirrored,
            overlaid,
        })
    }
}

/// Copy a single template file (such as the package manifest) into a user's bundle,
/// replacing any existing copy.
pub fn copy_template_file(
    template: &Path,
    bundle_root: &Path,
    file: &str,
) -> Result<PathBuf, WorkspaceError> {
    let source = template.join(file);
    if !source.is_file() {
        return Err(WorkspaceError::MissingTemplate { path: source });
    }
    let target = bundle_root.join(file);
    copy_creating_directories(&source, &target)?;
    Ok(target)
}
