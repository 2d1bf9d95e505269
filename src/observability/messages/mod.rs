// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line, and lifecycle events
//! also implement [`StructuredLog`] so they are emitted with their fields attached.
//!
//! # Organization
//!
//! * `stage` - pipeline and stage lifecycle events
//! * `workspace` - scratch workspace preparation
//! * `decoder` - event-stream lines that were dropped
//!
//! # Usage Pattern
//!
//! ```rust
//! use playground_runner::observability::messages::stage::StageStarted;
//! use playground_runner::observability::messages::StructuredLog;
//!
//! let msg = StageStarted {
//!     stage: "build",
//!     program: "swift",
//!     arg_count: 1,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod decoder;
pub mod stage;
pub mod workspace;

/// A log message that knows its level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its level with structured fields.
    fn log(&self);

    /// A span carrying the same fields, for wrapping the work the message describes.
    /// Messages that only report an outcome have no work to wrap.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
