// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::Arc;

use crate::bundle::SourceBundle;
use crate::config::consts::BUNDLE_SUFFIX;
use crate::config::Config;
use crate::engine::{PlaygroundPipeline, ProcessStageRunner};
use crate::playground::Playground;
use crate::traits::StageRunner;
use crate::workspace::WorkspacePreparer;

/// Playground runtime builder - wires workspace preparation, the stage runner and the
/// toolchain commands together from configuration.
///
/// # Examples
///
/// ```
/// use playground_runner::config::{Config, RuntimeBuilder};
///
/// let config = Config::default();
/// let playground = RuntimeBuilder::from_config(&config, "/work/Demo.playground/Contents.swift");
///
/// assert!(playground.workspace_path().starts_with(config.storage_root()));
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a playground for `entry` that runs stages as OS processes.
    ///
    /// The bundle is the nearest enclosing `.playground` directory of `entry`, or its parent.
    /// Passing a bundle directory selects its configured entry file.
    pub fn from_config(cfg: &Config, entry: impl Into<PathBuf>) -> Playground {
        let runner = Arc::new(ProcessStageRunner::new(cfg.executor_options.timeout()));
        Self::with_runner(cfg, entry, runner)
    }

    /// Same as [`RuntimeBuilder::from_config`] with a caller-supplied stage runner.
    pub fn with_runner(
        cfg: &Config,
        entry: impl Into<PathBuf>,
        runner: Arc<dyn StageRunner>,
    ) -> Playground {
        let bundle = SourceBundle::from_entry(resolve_entry(cfg, entry.into()));
        let preparer = WorkspacePreparer::new(cfg.storage_root(), cfg.workspace.clone());
        let pipeline = PlaygroundPipeline::new(runner, cfg.toolchain.clone());
        Playground::new(bundle, cfg.template.clone(), preparer, pipeline)
    }
}

fn resolve_entry(cfg: &Config, entry: PathBuf) -> PathBuf {
    let is_bundle = entry.is_dir() || entry.to_string_lossy().ends_with(BUNDLE_SUFFIX);
    if is_bundle {
        entry.join(&cfg.workspace.entry_file)
    } else {
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_bundle_directory_resolves_to_entry_file() {
        let cfg = Config::default();
        let playground = RuntimeBuilder::from_config(&cfg, "/work/Demo.playground");

        assert_eq!(
            playground.entry(),
            Path::new("/work/Demo.playground/Contents.swift")
        );
        assert_eq!(playground.bundle().root(), Path::new("/work/Demo.playground"));
    }

    #[test]
    fn test_entry_file_is_kept() {
        let cfg = Config::default();
        let playground = RuntimeBuilder::from_config(&cfg, "/work/scratch/main.swift");

        assert_eq!(playground.entry(), Path::new("/work/scratch/main.swift"));
        assert_eq!(playground.bundle().root(), Path::new("/work/scratch"));
    }
}
