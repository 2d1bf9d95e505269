// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use crate::config::CommandConfig;

/// Label of the build-introspection stage
pub const MANIFEST_STAGE: &str = "manifest";
/// Label of the compile stage
pub const BUILD_STAGE: &str = "build";
/// Label of the stage that runs the built program
pub const EXECUTE_STAGE: &str = "execute";

/// A fully resolved external-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub stage: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

impl StageCommand {
    pub fn new(stage: impl Into<String>, program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            stage: stage.into(),
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    pub fn from_config(stage: impl Into<String>, config: &CommandConfig, cwd: &Path) -> Self {
        Self::new(stage, config.program.clone(), cwd).args(config.args.iter().cloned())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}
