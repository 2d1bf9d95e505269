// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use tokio::sync::mpsc;

/// One of the byte streams a stage process can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
    /// The side channel carrying the structured event stream
    Aux,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [StreamKind::Stdout, StreamKind::Stderr, StreamKind::Aux];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
            StreamKind::Aux => "aux",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes read from one stream, in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    pub stream: StreamKind,
    pub bytes: Vec<u8>,
}

impl StreamChunk {
    pub fn new(stream: StreamKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            stream,
            bytes: bytes.into(),
        }
    }
}

pub type ChunkSender = mpsc::UnboundedSender<StreamChunk>;

/// Destinations for a stage's streams. A stream with no sink is not captured at all.
///
/// Several streams may share one sender; chunks then interleave in arrival order, which is
/// only meaningful within a single stream.
#[derive(Debug, Clone, Default)]
pub struct StreamSinks {
    stdout: Option<ChunkSender>,
    stderr: Option<ChunkSender>,
    aux: Option<ChunkSender>,
}

impl StreamSinks {
    pub fn none() -> Self {
        Self::default()
    }

    /// Wire `stream` to `sender`, replacing any previous sink for it.
    pub fn with(mut self, stream: StreamKind, sender: ChunkSender) -> Self {
        *self.slot(stream) = Some(sender);
        self
    }

    /// Wire every listed stream to clones of `sender`.
    pub fn all_to(streams: &[StreamKind], sender: &ChunkSender) -> Self {
        streams
            .iter()
            .fold(Self::none(), |sinks, stream| sinks.with(*stream, sender.clone()))
    }

    pub fn get(&self, stream: StreamKind) -> Option<&ChunkSender> {
        match stream {
            StreamKind::Stdout => self.stdout.as_ref(),
            StreamKind::Stderr => self.stderr.as_ref(),
            StreamKind::Aux => self.aux.as_ref(),
        }
    }

    pub fn wants(&self, stream: StreamKind) -> bool {
        self.get(stream).is_some()
    }

    /// Remove and return the sink for `stream`.
    pub fn take(&mut self, stream: StreamKind) -> Option<ChunkSender> {
        self.slot(stream).take()
    }

    fn slot(&mut self, stream: StreamKind) -> &mut Option<ChunkSender> {
        match stream {
            StreamKind::Stdout => &mut self.stdout,
            StreamKind::Stderr => &mut self.stderr,
            StreamKind::Aux => &mut self.aux,
        }
    }
}
