// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::records::LineNumber;

/// Reasons a single event-stream line is dropped. Never fatal to the stream.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown api kind '{0}'")]
    UnknownApi(String),

    #[error("invalid source range: start line {start_line}, end line {end_line}")]
    InvalidRange {
        start_line: LineNumber,
        end_line: LineNumber,
    },

    #[error("source range {start_line}..={end_line} spans more than {max} lines")]
    RangeTooWide {
        start_line: LineNumber,
        end_line: LineNumber,
        max: LineNumber,
    },
}
