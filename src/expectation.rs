// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Golden-output checks for playgrounds.
//!
//! The records a playground emits are compared against a JSON array stored beside its entry
//! file. A missing expectation is written from the actual output, as is every expectation when
//! overwriting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::bundle::sibling_with_extension;
use crate::config::consts::EXPECTATION_EXTENSION;
use crate::errors::ExpectationError;
use crate::records::LogRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpectationOutcome {
    Matched,
    /// The expectation file was (re)written from the actual records
    Written,
    Mismatch {
        expected: Vec<LogRecord>,
        actual: Vec<LogRecord>,
    },
}

impl ExpectationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExpectationOutcome::Mismatch { .. })
    }
}

/// `Foo.swift` -> `Foo.expectation`
pub fn expectation_path(entry: &Path) -> PathBuf {
    sibling_with_extension(entry, EXPECTATION_EXTENSION)
}

pub fn check_expectation(
    records: &[LogRecord],
    path: &Path,
    overwrite: bool,
) -> Result<ExpectationOutcome, ExpectationError> {
    let expected = if overwrite { None } else { read_expectation(path) };

    match expected {
        Some(expected) if expected == records => Ok(ExpectationOutcome::Matched),
        Some(expected) => Ok(ExpectationOutcome::Mismatch {
            expected,
            actual: records.to_vec(),
        }),
        None => {
            write_expectation(records, path)?;
            Ok(ExpectationOutcome::Written)
        }
    }
}

fn read_expectation(path: &Path) -> Option<Vec<LogRecord>> {
    let content = fs::read(path).ok()?;
    match serde_json::from_slice(&content) {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Unreadable expectation file; it will be rewritten"
            );
            None
        }
    }
}

fn write_expectation(records: &[LogRecord], path: &Path) -> Result<(), ExpectationError> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| ExpectationError::Write {
        path: path.to_path_buf(),
        source,
    })
}
