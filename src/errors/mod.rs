// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod decode;
mod execution;
mod expectation;
mod workspace;

pub use config::{ConfigError, ValidationError};
pub use decode::DecodeError;
pub use execution::ExecutionError;
pub use expectation::ExpectationError;
pub use workspace::WorkspaceError;
