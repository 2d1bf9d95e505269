// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Failures while recording an expectation file.
///
/// A missing or unreadable expectation is not an error: it is rewritten from the actual output.
#[derive(Error, Debug)]
pub enum ExpectationError {
    #[error("failed to write expectation '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
}
