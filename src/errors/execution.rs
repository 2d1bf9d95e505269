// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by a playground run.
//!
//! Every variant is fatal for the run that raised it: remaining stages are skipped and output
//! already forwarded to the caller stays where it is. Nothing here is retried automatically.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::engine::StreamKind;
use crate::errors::WorkspaceError;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Build introspection returned a shape the pipeline cannot act on.
    #[error("manifest error: {reason}")]
    Manifest { reason: String },

    #[error("stage '{stage}' exited with code {code}")]
    ProcessExit { stage: String, code: i32 },

    #[error("stage '{stage}' was terminated by signal {signal}")]
    ProcessSignaled { stage: String, signal: i32 },

    /// A stream of the child dropped abnormally while it was being read.
    #[error("stage '{stage}' lost its {stream} channel: {reason}")]
    ProcessDisconnect {
        stage: String,
        stream: StreamKind,
        reason: String,
    },

    #[error("stage '{stage}' failed to spawn '{program}': {source}")]
    Spawn {
        stage: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The OS failed while waiting on a spawned process.
    #[error("stage '{stage}' process error: {source}")]
    Process {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stage '{stage}' timed out after {timeout:?}")]
    StageTimedOut { stage: String, timeout: Duration },

    #[error("stage '{stage}' was cancelled")]
    Cancelled { stage: String },

    #[error("a run is already in progress for '{}'", path.display())]
    RunInProgress { path: PathBuf },

    #[error("no playground session is open for '{}'", path.display())]
    NoSession { path: PathBuf },

    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl ExecutionError {
    /// Exit code of the failing stage, when the failure was a non-zero exit.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionError::ProcessExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}
