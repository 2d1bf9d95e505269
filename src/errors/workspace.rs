// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while materializing a scratch workspace.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while preparing a scratch workspace. All of them abort a run before any process
/// is spawned.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// The generated main-entry file would overwrite one the user's bundle already provides.
    #[error("workspace initialization failed: '{}' already exists in the bundle sources", path.display())]
    EntryConflict { path: PathBuf },

    #[error("entry file '{}' not found", path.display())]
    MissingEntry { path: PathBuf },

    #[error("template directory '{}' not found", path.display())]
    MissingTemplate { path: PathBuf },

    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkspaceError::Io {
            path: path.into(),
            source,
        }
    }
}
