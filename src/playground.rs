// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One runnable playground: a source bundle, the workspace it is prepared into, and the
//! pipeline that builds and executes it.
//!
//! A `Playground` holds no per-run state. Every [`Playground::run`] prepares a fresh
//! workspace, so two overlapping runs of the same file would trample each other's scratch
//! directory; callers that can overlap should go through [`crate::session::SessionRegistry`].

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::bundle::SourceBundle;
use crate::engine::{EventSender, PackageManifest, PipelineEvent, PlaygroundPipeline, RunSummary};
use crate::errors::ExecutionError;
use crate::observability::messages::stage::{RunCompleted, RunStarted};
use crate::observability::messages::StructuredLog;
use crate::records::LogRecord;
use crate::workspace::{PreparedWorkspace, WorkspacePreparer};

type RecordCallback<'a> = Box<dyn FnMut(LogRecord) + Send + 'a>;
type OutputCallback<'a> = Box<dyn FnMut(&[u8]) + Send + 'a>;

/// Receivers for the output of a run. Only `on_record` is required.
pub struct RunCallbacks<'a> {
    on_record: RecordCallback<'a>,
    on_stdout: Option<OutputCallback<'a>>,
    on_stderr: Option<OutputCallback<'a>>,
}

impl<'a> RunCallbacks<'a> {
    pub fn new(on_record: impl FnMut(LogRecord) + Send + 'a) -> Self {
        Self {
            on_record: Box::new(on_record),
            on_stdout: None,
            on_stderr: None,
        }
    }

    pub fn on_stdout(mut self, callback: impl FnMut(&[u8]) + Send + 'a) -> Self {
        self.on_stdout = Some(Box::new(callback));
        self
    }

    pub fn on_stderr(mut self, callback: impl FnMut(&[u8]) + Send + 'a) -> Self {
        self.on_stderr = Some(Box::new(callback));
        self
    }

    fn dispatch(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Record(record) => (self.on_record)(record),
            PipelineEvent::Stdout(bytes) => {
                if let Some(callback) = self.on_stdout.as_mut() {
                    callback(&bytes);
                }
            }
            PipelineEvent::Stderr(bytes) => {
                if let Some(callback) = self.on_stderr.as_mut() {
                    callback(&bytes);
                }
            }
        }
    }
}

pub struct Playground {
    bundle: SourceBundle,
    template: PathBuf,
    preparer: WorkspacePreparer,
    pipeline: PlaygroundPipeline,
}

impl Playground {
    pub fn new(
        bundle: SourceBundle,
        template: impl Into<PathBuf>,
        preparer: WorkspacePreparer,
        pipeline: PlaygroundPipeline,
    ) -> Self {
        Self {
            bundle,
            template: template.into(),
            preparer,
            pipeline,
        }
    }

    pub fn bundle(&self) -> &SourceBundle {
        &self.bundle
    }

    pub fn entry(&self) -> &Path {
        self.bundle.entry()
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Scratch directory this playground builds in.
    pub fn workspace_path(&self) -> PathBuf {
        self.preparer.scratch_path(&self.bundle)
    }

    /// Rebuild the scratch workspace. Filesystem work happens on the blocking pool.
    pub async fn prepare(&self) -> Result<PreparedWorkspace, ExecutionError> {
        let preparer = self.preparer.clone();
        let bundle = self.bundle.clone();
        let template = self.template.clone();

        let prepared = tokio::task::spawn_blocking(move || preparer.prepare(&bundle, &template))
            .await
            .map_err(|e| ExecutionError::InternalError {
                message: format!("workspace preparation task failed: {}", e),
            })??;
        Ok(prepared)
    }

    /// Prepare the workspace and describe its package without building it.
    pub async fn manifest(
        &self,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<PackageManifest, ExecutionError> {
        let prepared = self.prepare().await?;
        self.pipeline.manifest(&prepared.root, events, cancel).await
    }

    /// Prepare, build and execute, streaming output to `events` as it arrives.
    pub async fn run_with_events(
        &self,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, ExecutionError> {
        let started = Instant::now();
        let prepared = self.prepare().await?;
        let start_msg = RunStarted {
            entry: self.entry(),
            workspace: &prepared.root,
        };
        let span = start_msg.span("playground_run");
        span.in_scope(|| start_msg.log());

        let summary = self
            .pipeline
            .run(&prepared.root, events, cancel)
            .instrument(span)
            .await?;

        RunCompleted {
            record_count: summary.records,
            dropped_count: summary.dropped,
            duration: started.elapsed(),
        }
        .log();
        Ok(summary)
    }

    /// Callback flavour of [`Playground::run_with_events`].
    ///
    /// Callbacks fire incrementally while the program runs. On failure, whatever was already
    /// delivered stays delivered.
    pub async fn run(
        &self,
        mut callbacks: RunCallbacks<'_>,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, ExecutionError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        // The sender lives only as long as the run, which ends the dispatch loop
        let run = async move { self.run_with_events(&tx, cancel).await };
        let dispatch = async {
            while let Some(event) = rx.recv().await {
                callbacks.dispatch(event);
            }
        };

        let (result, ()) = tokio::join!(run, dispatch);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ToolchainConfig, WorkspaceConfig};
    use crate::engine::stub::{RecordingRunner, ScriptedStage};
    use crate::engine::{StreamKind, BUILD_STAGE, EXECUTE_STAGE, MANIFEST_STAGE};
    use crate::errors::WorkspaceError;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        runner: Arc<RecordingRunner>,
        playground: Playground,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let bundle_root = dir.path().join("Demo.playground");
        fs::create_dir_all(&bundle_root).unwrap();
        fs::write(bundle_root.join("Contents.swift"), "let x = 1\n").unwrap();
        let template = dir.path().join("template");
        fs::create_dir_all(&template).unwrap();
        fs::write(template.join("Package.swift"), "// package\n").unwrap();

        let runner = Arc::new(RecordingRunner::new());
        runner.script(
            MANIFEST_STAGE,
            ScriptedStage::ok().emit(
                StreamKind::Stdout,
                br#"{"name":"Playground","targets":[{"name":"Playground"}]}"#,
            ),
        );

        let playground = Playground::new(
            SourceBundle::from_entry(bundle_root.join("Contents.swift")),
            template,
            WorkspacePreparer::new(dir.path().join("storage"), WorkspaceConfig::default()),
            PlaygroundPipeline::new(runner.clone(), ToolchainConfig::default()),
        );
        Fixture {
            dir,
            runner,
            playground,
        }
    }

    #[tokio::test]
    async fn test_run_dispatches_callbacks() {
        let fx = fixture();
        fx.runner.script(
            EXECUTE_STAGE,
            ScriptedStage::ok()
                .emit(StreamKind::Stdout, b"x is 1\n")
                .emit(
                    StreamKind::Aux,
                    b"{\"api\":\"log\",\"range\":{\"sl\":1,\"el\":1,\"sc\":1,\"ec\":9},\"name\":\"x\",\"object\":\"1\"}\n",
                ),
        );

        let records = Mutex::new(Vec::new());
        let stdout = Mutex::new(Vec::new());
        let callbacks = RunCallbacks::new(|record| records.lock().unwrap().push(record))
            .on_stdout(|bytes| stdout.lock().unwrap().extend_from_slice(bytes));

        let summary = fx
            .playground
            .run(callbacks, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(records.lock().unwrap()[0].object_description.as_deref(), Some("1"));
        assert_eq!(stdout.lock().unwrap().as_slice(), b"x is 1\n");

        let workspace = fx.playground.workspace_path();
        assert!(workspace.join("Sources/main.swift").is_file());
        assert!(workspace.join("Package.swift").is_file());
        assert!(workspace.starts_with(fx.dir.path().join("storage")));
        assert_eq!(
            fx.runner.invoked(),
            vec![MANIFEST_STAGE, BUILD_STAGE, EXECUTE_STAGE]
        );
    }

    #[tokio::test]
    async fn test_entry_conflict_aborts_before_any_stage() {
        let fx = fixture();
        let sources = fx.dir.path().join("Demo.playground/Sources");
        fs::create_dir_all(&sources).unwrap();
        fs::write(sources.join("main.swift"), "print(1)\n").unwrap();

        let err = fx
            .playground
            .run(RunCallbacks::new(|_| {}), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExecutionError::Workspace(WorkspaceError::EntryConflict { .. })
        ));
        assert!(fx.runner.invoked().is_empty());
    }

    #[tokio::test]
    async fn test_manifest_only_runs_introspection() {
        let fx = fixture();
        let (tx, _rx) = mpsc::unbounded_channel();

        let manifest = fx
            .playground
            .manifest(&tx, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(manifest.name, "Playground");
        assert_eq!(fx.runner.invoked(), vec![MANIFEST_STAGE]);
    }
}
