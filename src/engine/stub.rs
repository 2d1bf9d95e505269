// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scripted [`StageRunner`] for tests that should not spawn processes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::engine::{StageCommand, StreamChunk, StreamKind, StreamSinks};
use crate::errors::ExecutionError;
use crate::traits::StageRunner;

#[derive(Debug, Clone)]
enum Outcome {
    Succeed,
    Exit(i32),
    /// Block until the token fires, then report cancellation
    AwaitCancel,
}

/// What a stage emits and how it ends.
#[derive(Debug, Clone)]
pub struct ScriptedStage {
    chunks: Vec<StreamChunk>,
    outcome: Outcome,
}

impl ScriptedStage {
    pub fn ok() -> Self {
        Self {
            chunks: Vec::new(),
            outcome: Outcome::Succeed,
        }
    }

    pub fn exit(code: i32) -> Self {
        Self {
            chunks: Vec::new(),
            outcome: Outcome::Exit(code),
        }
    }

    pub fn until_cancelled() -> Self {
        Self {
            chunks: Vec::new(),
            outcome: Outcome::AwaitCancel,
        }
    }

    pub fn emit(mut self, stream: StreamKind, bytes: &[u8]) -> Self {
        self.chunks.push(StreamChunk::new(stream, bytes));
        self
    }
}

/// Records every command it is asked to run. Unscripted stages succeed silently.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    scripts: Mutex<HashMap<String, ScriptedStage>>,
    commands: Mutex<Vec<StageCommand>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, stage: &str, scripted: ScriptedStage) {
        self.scripts
            .lock()
            .unwrap()
            .insert(stage.to_string(), scripted);
    }

    pub fn commands(&self) -> Vec<StageCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn invoked(&self) -> Vec<String> {
        self.commands().into_iter().map(|c| c.stage).collect()
    }
}

#[async_trait]
impl StageRunner for RecordingRunner {
    async fn run_stage(
        &self,
        command: &StageCommand,
        sinks: StreamSinks,
        cancel: CancellationToken,
    ) -> Result<(), ExecutionError> {
        self.commands.lock().unwrap().push(command.clone());
        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get(&command.stage)
            .cloned()
            .unwrap_or_else(ScriptedStage::ok);

        for chunk in scripted.chunks {
            if let Some(sink) = sinks.get(chunk.stream) {
                let _ = sink.send(chunk);
            }
        }

        match scripted.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Exit(code) => Err(ExecutionError::ProcessExit {
                stage: command.stage.clone(),
                code,
            }),
            Outcome::AwaitCancel => {
                cancel.cancelled().await;
                Err(ExecutionError::Cancelled {
                    stage: command.stage.clone(),
                })
            }
        }
    }
}
