// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Incremental decoder for the newline-delimited JSON event stream.
//!
//! The executed program writes one JSON object per line to its side channel. Bytes arrive in
//! arbitrary chunks, so the decoder buffers until a newline completes a record and yields
//! records in arrival order. A line that does not decode is dropped and logged; the stream
//! carries on.

use serde::Deserialize;

use crate::config::consts::MAX_RECORD_SPAN_LINES;
use crate::errors::DecodeError;
use crate::observability::messages::decoder::RecordDropped;
use crate::records::{Api, LogRecord, SourceRange};

/// Wire shape before the `api` tag is checked against the known kinds.
#[derive(Debug, Deserialize)]
struct WireRecord {
    api: String,
    range: SourceRange,
    #[serde(default)]
    object: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<i64>,
}

/// Decode a single line of the event stream.
///
/// Returns `Ok(None)` for blank lines. Unknown `api` kinds, ranges that violate
/// `1 <= startLine <= endLine` and ranges wider than [`MAX_RECORD_SPAN_LINES`] are rejected
/// rather than passed through.
pub fn decode_line(line: &[u8]) -> Result<Option<LogRecord>, DecodeError> {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let wire: WireRecord = serde_json::from_slice(trimmed)?;
    let api = Api::from_tag(&wire.api).ok_or(DecodeError::UnknownApi(wire.api))?;
    if !wire.range.is_valid() {
        return Err(DecodeError::InvalidRange {
            start_line: wire.range.start_line,
            end_line: wire.range.end_line,
        });
    }
    if wire.range.end_line - wire.range.start_line >= MAX_RECORD_SPAN_LINES {
        return Err(DecodeError::RangeTooWide {
            start_line: wire.range.start_line,
            end_line: wire.range.end_line,
            max: MAX_RECORD_SPAN_LINES,
        });
    }

    Ok(Some(LogRecord {
        api,
        range: wire.range,
        object_description: wire.object,
        name: wire.name,
        id: wire.id,
    }))
}

/// Chunk-fed ndjson decoder. Not restartable: once `finish` is called the stream is over.
#[derive(Debug, Default)]
pub struct RecordDecoder {
    buffer: Vec<u8>,
    line_number: usize,
    decoded: usize,
    dropped: usize,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every record completed by it, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<LogRecord> {
        // The carried-over tail holds no newline, so only the new bytes need scanning
        let mut scan_from = self.buffer.len();
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.extend_from_slice(chunk);

        let mut records = Vec::new();
        let mut line_start = 0;
        while let Some(offset) = buffer[scan_from..].iter().position(|b| *b == b'\n') {
            let line_end = scan_from + offset + 1;
            if let Some(record) = self.decode(&buffer[line_start..line_end]) {
                records.push(record);
            }
            line_start = line_end;
            scan_from = line_end;
        }

        buffer.drain(..line_start);
        self.buffer = buffer;
        records
    }

    /// Flush whatever is left once the stream has closed.
    ///
    /// A final record missing its trailing newline is still decoded.
    pub fn finish(&mut self) -> Option<LogRecord> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        self.decode(&line)
    }

    /// Records decoded so far.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    /// Lines dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn decode(&mut self, line: &[u8]) -> Option<LogRecord> {
        self.line_number += 1;
        match decode_line(line) {
            Ok(Some(record)) => {
                self.decoded += 1;
                Some(record)
            }
            Ok(None) => None,
            Err(error) => {
                self.dropped += 1;
                let text = String::from_utf8_lossy(line);
                tracing::warn!(
                    "{}",
                    RecordDropped {
                        line_number: self.line_number,
                        line: text.trim_end(),
                        error: &error,
                    }
                );
                None
            }
        }
    }
}
