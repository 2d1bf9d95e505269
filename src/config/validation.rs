// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Every check runs and all problems are reported together, so a broken config file can be
//! fixed in one pass.

use crate::config::Config;
use crate::errors::ValidationError;

/// Validate a loaded configuration, returning every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut stages = vec![
        ("manifest", &config.toolchain.manifest),
        ("build", &config.toolchain.build),
    ];
    if let Some(execute) = &config.toolchain.execute {
        stages.push(("execute", execute));
    }
    for (stage, command) in stages {
        if command.program.trim().is_empty() {
            errors.push(ValidationError::EmptyProgram {
                stage: stage.to_string(),
            });
        }
    }

    let layout = [
        ("workspace.entry_file", &config.workspace.entry_file),
        ("workspace.sources_dir", &config.workspace.sources_dir),
        ("workspace.main_file", &config.workspace.main_file),
    ];
    for (field, value) in layout {
        if !is_single_component(value) {
            errors.push(ValidationError::InvalidLayoutName {
                field: field.to_string(),
                value: value.clone(),
            });
        }
    }

    for (index, pattern) in config.workspace.exclude.iter().enumerate() {
        if pattern.is_empty() {
            errors.push(ValidationError::EmptyExcludePattern { index });
        }
    }

    if config.executor_options.timeout_seconds == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_single_component(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains('/')
        && !value.contains('\\')
}
