// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event records emitted by an executed playground and the decoder for their wire format.

mod decoder;
mod record;

pub use decoder::{decode_line, RecordDecoder};
pub use record::{Api, ColumnNumber, LineNumber, LogRecord, SourceRange};
