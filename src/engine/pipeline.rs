// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage sequencing for one playground run.
//!
//! Each stage is driven the same way: the runner future and a loop draining its chunk channel
//! are joined, so output reaches the caller while the process is still running and nothing
//! emitted before a failure is lost. Stages are awaited one at a time; the first failure ends
//! the run.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ToolchainConfig;
use crate::engine::manifest::PackageManifest;
use crate::engine::stage::{BUILD_STAGE, EXECUTE_STAGE, MANIFEST_STAGE};
use crate::engine::{StageCommand, StreamChunk, StreamKind, StreamSinks};
use crate::errors::ExecutionError;
use crate::observability::messages::stage::StageFailed;
use crate::observability::messages::StructuredLog;
use crate::records::{LogRecord, RecordDecoder};
use crate::traits::StageRunner;

/// Everything a run hands back to its caller while it is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Record(LogRecord),
}

pub type EventSender = mpsc::UnboundedSender<PipelineEvent>;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub manifest: PackageManifest,
    pub records: usize,
    pub dropped: usize,
}

/// Counts from the execute stage's event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOutcome {
    pub records: usize,
    pub dropped: usize,
}

/// Runs manifest, build and execute against a prepared workspace.
#[derive(Clone)]
pub struct PlaygroundPipeline {
    runner: Arc<dyn StageRunner>,
    toolchain: ToolchainConfig,
}

impl PlaygroundPipeline {
    pub fn new(runner: Arc<dyn StageRunner>, toolchain: ToolchainConfig) -> Self {
        Self { runner, toolchain }
    }

    pub fn toolchain(&self) -> &ToolchainConfig {
        &self.toolchain
    }

    /// Run every stage in order.
    pub async fn run(
        &self,
        workspace: &Path,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, ExecutionError> {
        let manifest = self.manifest(workspace, events, cancel).await?;
        // Checked before building so a bad package fails fast
        manifest.single_target()?;
        self.build(workspace, events, cancel).await?;
        let outcome = self.execute(workspace, &manifest, events, cancel).await?;

        Ok(RunSummary {
            manifest,
            records: outcome.records,
            dropped: outcome.dropped,
        })
    }

    /// Introspect the package. stdout is the manifest document; stderr is forwarded.
    pub async fn manifest(
        &self,
        workspace: &Path,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<PackageManifest, ExecutionError> {
        let command = StageCommand::from_config(MANIFEST_STAGE, &self.toolchain.manifest, workspace);
        let mut document = Vec::new();

        self.drive(
            &command,
            &[StreamKind::Stdout, StreamKind::Stderr],
            cancel,
            |chunk| match chunk.stream {
                StreamKind::Stdout => document.extend_from_slice(&chunk.bytes),
                _ => forward(events, chunk),
            },
        )
        .await?;

        PackageManifest::parse(&document)
    }

    /// Compile the workspace, forwarding its output.
    pub async fn build(
        &self,
        workspace: &Path,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExecutionError> {
        let command = StageCommand::from_config(BUILD_STAGE, &self.toolchain.build, workspace);
        self.drive(
            &command,
            &[StreamKind::Stdout, StreamKind::Stderr],
            cancel,
            |chunk| forward(events, chunk),
        )
        .await
    }

    /// Run the built program, decoding its side channel into records.
    ///
    /// Records decoded before a failure have already been sent when the error is returned.
    pub async fn execute(
        &self,
        workspace: &Path,
        manifest: &PackageManifest,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<ExecuteOutcome, ExecutionError> {
        let command = self.execute_command(workspace, manifest)?;
        let mut decoder = RecordDecoder::new();

        let result = self
            .drive(&command, &StreamKind::ALL, cancel, |chunk| match chunk.stream {
                StreamKind::Aux => {
                    for record in decoder.feed(&chunk.bytes) {
                        let _ = events.send(PipelineEvent::Record(record));
                    }
                }
                _ => forward(events, chunk),
            })
            .await;

        if let Some(record) = decoder.finish() {
            let _ = events.send(PipelineEvent::Record(record));
        }
        result?;

        Ok(ExecuteOutcome {
            records: decoder.decoded(),
            dropped: decoder.dropped(),
        })
    }

    fn execute_command(
        &self,
        workspace: &Path,
        manifest: &PackageManifest,
    ) -> Result<StageCommand, ExecutionError> {
        match &self.toolchain.execute {
            Some(config) => Ok(StageCommand::from_config(EXECUTE_STAGE, config, workspace)),
            None => {
                let executable = manifest.executable_path(workspace)?;
                Ok(StageCommand::new(
                    EXECUTE_STAGE,
                    executable.to_string_lossy().into_owned(),
                    workspace,
                ))
            }
        }
    }

    /// Run one stage while draining its chunk channel into `on_chunk`.
    async fn drive<F>(
        &self,
        command: &StageCommand,
        streams: &[StreamKind],
        cancel: &CancellationToken,
        mut on_chunk: F,
    ) -> Result<(), ExecutionError>
    where
        F: FnMut(StreamChunk),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sinks = StreamSinks::all_to(streams, &tx);
        // Only the sinks hold senders now, so the drain ends once the runner lets go of them
        drop(tx);

        let stage = self.runner.run_stage(command, sinks, cancel.clone());
        let drain = async {
            while let Some(chunk) = rx.recv().await {
                on_chunk(chunk);
            }
        };
        let (result, ()) = tokio::join!(stage, drain);

        if let Err(e) = &result {
            StageFailed {
                stage: &command.stage,
                error: e,
            }
            .log();
        }
        result
    }
}

fn forward(events: &EventSender, chunk: StreamChunk) {
    let event = match chunk.stream {
        StreamKind::Stdout => PipelineEvent::Stdout(chunk.bytes),
        StreamKind::Stderr => PipelineEvent::Stderr(chunk.bytes),
        // Side-channel bytes are only meaningful to the decoder
        StreamKind::Aux => return,
    };
    let _ = events.send(event);
}
