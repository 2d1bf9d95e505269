// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline and stage lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * A playground run starting, completing or failing
//! * Each external-process stage starting, completing or failing

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;
use tracing::Span;

/// A playground run started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunStarted<'a> {
    pub entry: &'a Path,
    pub workspace: &'a Path,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running playground '{}' in workspace '{}'",
            self.entry.display(),
            self.workspace.display()
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            entry = %self.entry.display(),
            workspace = %self.workspace.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            entry = %self.entry.display(),
        )
    }
}

/// A playground run completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use playground_runner::observability::messages::stage::RunCompleted;
/// use std::time::Duration;
///
/// let msg = RunCompleted {
///     record_count: 12,
///     dropped_count: 0,
///     duration: Duration::from_millis(900),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunCompleted {
    pub record_count: usize,
    pub dropped_count: usize,
    pub duration: Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Playground run completed: {} records ({} dropped) in {:?}",
            self.record_count, self.dropped_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            record_count = self.record_count,
            dropped_count = self.dropped_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A stage is about to spawn its process.
///
/// # Log Level
/// `debug!` - Per-stage detail
pub struct StageStarted<'a> {
    pub stage: &'a str,
    pub program: &'a str,
    pub arg_count: usize,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting stage '{}': {} ({} args)",
            self.stage, self.program, self.arg_count
        )
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            program = self.program,
            arg_count = self.arg_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage",
            span_name = name,
            stage = self.stage,
            program = self.program,
        )
    }
}

/// A stage's process exited with status 0.
///
/// # Log Level
/// `debug!` - Per-stage detail
pub struct StageCompleted<'a> {
    pub stage: &'a str,
    pub duration: Duration,
}

impl Display for StageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' completed in {:?}", self.stage, self.duration)
    }
}

impl StructuredLog for StageCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A stage failed; the run stops here.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use playground_runner::observability::messages::stage::StageFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "exit 2");
/// let msg = StageFailed {
///     stage: "build",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct StageFailed<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StageFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' failed: {}", self.stage, self.error)
    }
}

impl StructuredLog for StageFailed<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            error = %self.error,
            "{}", self
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_debug_subscriber(check: impl FnOnce()) {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, check);
    }

    #[test]
    fn test_stage_and_run_spans_carry_their_fields() {
        with_debug_subscriber(|| {
            let stage = StageStarted {
                stage: "build",
                program: "swift",
                arg_count: 1,
            }
            .span("run_stage");
            let metadata = stage.metadata().unwrap();
            assert_eq!(metadata.name(), "stage");
            assert!(metadata.fields().field("program").is_some());

            let run = RunStarted {
                entry: Path::new("/work/Demo.playground/Contents.swift"),
                workspace: Path::new("/tmp/swift-playground-0"),
            }
            .span("playground_run");
            assert_eq!(run.metadata().unwrap().name(), "run");
        });
    }

    #[test]
    fn test_outcome_messages_have_no_span() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "exit 2");
        let failed = StageFailed {
            stage: "build",
            error: &error,
        };
        assert!(failed.span("stage_failed").is_none());
    }
}
