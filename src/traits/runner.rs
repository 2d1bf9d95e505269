// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::engine::{StageCommand, StreamSinks};
use crate::errors::ExecutionError;

#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Run one external-process stage to completion.
    ///
    /// - `command`: program, arguments and working directory
    /// - `sinks`: where each captured stream's chunks go; streams without a sink are discarded
    /// - `cancel`: stops the stage early, killing its process
    ///
    /// Resolves once the process has exited with status 0. Bytes are forwarded to the sinks
    /// incrementally while the process runs, in order within each stream, and everything
    /// emitted before a failure is forwarded before the error is returned.
    async fn run_stage(
        &self,
        command: &StageCommand,
        sinks: StreamSinks,
        cancel: CancellationToken,
    ) -> Result<(), ExecutionError>;
}
