// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the event-stream decoder.

use std::fmt::{Display, Formatter};

/// Longest slice of an offending line that ends up in the log.
const PREVIEW_CHARS: usize = 120;

/// An event-stream line was dropped.
///
/// # Log Level
/// `warn!` - Recoverable, the stream continues
///
/// # Example
/// ```
/// use playground_runner::observability::messages::decoder::RecordDropped;
///
/// let error = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad json");
/// let msg = RecordDropped {
///     line_number: 3,
///     line: "{not json",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct RecordDropped<'a> {
    pub line_number: usize,
    pub line: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RecordDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let preview: String = self.line.chars().take(PREVIEW_CHARS).collect();
        let marker = if self.line.chars().count() > PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        write!(
            f,
            "Dropped event-stream line {}: {} ({}{})",
            self.line_number, self.error, preview, marker
        )
    }
}
