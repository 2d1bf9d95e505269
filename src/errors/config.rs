// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating a loaded configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A toolchain stage names no program to run
    EmptyProgram {
        /// The stage whose program is empty
        stage: String,
    },
    /// A workspace layout name is empty or contains a path separator
    InvalidLayoutName {
        /// The configuration field
        field: String,
        /// The offending value
        value: String,
    },
    /// A timeout of zero would fail every stage immediately
    ZeroTimeout,
    /// An exclusion pattern is empty and would match nothing useful
    EmptyExcludePattern {
        /// Position of the pattern in the list
        index: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyProgram { stage } => {
                write!(f, "Toolchain stage '{}' has an empty program", stage)
            }
            ValidationError::InvalidLayoutName { field, value } => {
                write!(
                    f,
                    "Workspace field '{}' must be a single non-empty path component, got '{}'",
                    field, value
                )
            }
            ValidationError::ZeroTimeout => {
                write!(f, "executor_options.timeout_seconds must be greater than zero")
            }
            ValidationError::EmptyExcludePattern { index } => {
                write!(f, "Exclude pattern #{} is empty", index)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failures while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
