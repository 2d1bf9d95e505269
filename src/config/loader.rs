// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_ELLIPSIS, DEFAULT_ENTRY_FILE, DEFAULT_EXCLUDES, DEFAULT_MAIN_FILE,
    DEFAULT_SOURCES_DIR, DEFAULT_TRUNCATION_LENGTH,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for the playground runner.
///
/// Every section is optional; an empty file yields a configuration that drives the Swift
/// toolchain with the built-in defaults.
///
/// # Fields
/// * `storage_root` - Parent directory of scratch workspaces (defaults to the OS temp dir)
/// * `template` - Template overlay merged into every workspace
/// * `annotations` - Line annotation length budget
/// * `workspace` - Workspace layout and mirroring exclusions
/// * `toolchain` - Commands for the manifest, build and execute stages
/// * `executor_options` - Per-stage limits
///
/// # Example
/// ```yaml
/// storage_root: /tmp
/// template: build/template.playground
/// annotations:
///   truncation_length: 40
///   ellipsis: " ..."
/// toolchain:
///   build:
///     program: swift
///     args: [build]
/// executor_options:
///   timeout_seconds: 120
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage_root: Option<PathBuf>,
    #[serde(default = "default_template")]
    pub template: PathBuf,
    #[serde(default)]
    pub annotations: AnnotationConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: None,
            template: default_template(),
            annotations: AnnotationConfig::default(),
            workspace: WorkspaceConfig::default(),
            toolchain: ToolchainConfig::default(),
            executor_options: ExecutorOptions::default(),
        }
    }
}

impl Config {
    /// Storage root for scratch workspaces, falling back to the OS temp dir.
    pub fn storage_root(&self) -> PathBuf {
        self.storage_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

fn default_template() -> PathBuf {
    PathBuf::from("build/template.playground")
}

/// Annotation rendering options.
///
/// `truncation_length` below the ellipsis length is clamped up to it when rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "default_truncation_length")]
    pub truncation_length: usize,
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            truncation_length: DEFAULT_TRUNCATION_LENGTH,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }
}

fn default_truncation_length() -> usize {
    DEFAULT_TRUNCATION_LENGTH
}

fn default_ellipsis() -> String {
    DEFAULT_ELLIPSIS.to_string()
}

/// Workspace layout.
///
/// # Fields
/// * `exclude` - Name patterns of subtrees skipped while mirroring (`*` wildcards allowed)
/// * `entry_file` - The bundle's designated entry file name
/// * `sources_dir` - Directory compiled by the build tool
/// * `main_file` - Name the entry file is copied to inside `sources_dir`
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,
    #[serde(default = "default_entry_file")]
    pub entry_file: String,
    #[serde(default = "default_sources_dir")]
    pub sources_dir: String,
    #[serde(default = "default_main_file")]
    pub main_file: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            exclude: default_excludes(),
            entry_file: default_entry_file(),
            sources_dir: default_sources_dir(),
            main_file: default_main_file(),
        }
    }
}

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

fn default_entry_file() -> String {
    DEFAULT_ENTRY_FILE.to_string()
}

fn default_sources_dir() -> String {
    DEFAULT_SOURCES_DIR.to_string()
}

fn default_main_file() -> String {
    DEFAULT_MAIN_FILE.to_string()
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandConfig {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Commands for each pipeline stage.
///
/// `execute` is normally left unset: the program is then the executable the build stage
/// produced for the single manifest target.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default = "default_manifest_command")]
    pub manifest: CommandConfig,
    #[serde(default = "default_build_command")]
    pub build: CommandConfig,
    #[serde(default)]
    pub execute: Option<CommandConfig>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest_command(),
            build: default_build_command(),
            execute: None,
        }
    }
}

fn default_manifest_command() -> CommandConfig {
    CommandConfig::new("swift", ["package", "dump-package"])
}

fn default_build_command() -> CommandConfig {
    CommandConfig::new(
        "swift",
        [
            "build",
            "-Xswiftc",
            "-Xfrontend",
            "-Xswiftc",
            "-playground",
            "-Xswiftc",
            "-Xfrontend",
            "-Xswiftc",
            "-debugger-support",
        ],
    )
}

/// Per-stage execution limits.
///
/// # Fields
/// * `timeout_seconds` - Wall-clock limit applied to each stage separately (optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    pub timeout_seconds: Option<u64>,
}

impl ExecutorOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse a config from YAML text. An empty document yields the defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = serde_yaml::from_str(content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
storage_root: /var/tmp/playgrounds
template: templates/default.playground
annotations:
  truncation_length: 40
toolchain:
  build:
    program: swift
    args: [build, -c, debug]
  execute:
    program: ./run.sh
executor_options:
  timeout_seconds: 30
"#;

        let cfg = parse_config(yaml).unwrap();
        assert_eq!(cfg.storage_root(), PathBuf::from("/var/tmp/playgrounds"));
        assert_eq!(cfg.template, PathBuf::from("templates/default.playground"));
        assert_eq!(cfg.annotations.truncation_length, 40);
        assert_eq!(cfg.annotations.ellipsis, " ...");
        assert_eq!(cfg.toolchain.build.args, vec!["build", "-c", "debug"]);
        assert_eq!(cfg.toolchain.manifest, default_manifest_command());
        assert_eq!(
            cfg.toolchain.execute,
            Some(CommandConfig::new("./run.sh", Vec::<String>::new()))
        );
        assert_eq!(cfg.executor_options.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();

        assert_eq!(cfg.storage_root(), std::env::temp_dir());
        assert_eq!(cfg.annotations.truncation_length, DEFAULT_TRUNCATION_LENGTH);
        assert_eq!(cfg.workspace.entry_file, "Contents.swift");
        assert_eq!(cfg.workspace.main_file, "main.swift");
        assert_eq!(cfg.workspace.exclude.len(), DEFAULT_EXCLUDES.len());
        assert!(cfg.toolchain.build.args.contains(&"-playground".to_string()));
        assert!(cfg.toolchain.execute.is_none());
        assert!(cfg.executor_options.timeout().is_none());
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "annotations:\n  truncation_length: 2").unwrap();

        let cfg = load_and_validate_config(file.path()).unwrap();
        // Below the ellipsis floor is accepted; rendering clamps it
        assert_eq!(cfg.annotations.truncation_length, 2);
    }

    #[test]
    fn test_load_and_validate_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "toolchain:\n  build:\n    program: \"\"\nexecutor_options:\n  timeout_seconds: 0"
        )
        .unwrap();

        let error_msg = load_and_validate_config(file.path()).unwrap_err().to_string();
        assert!(error_msg.contains("Configuration validation failed"));
        assert!(error_msg.contains("'build' has an empty program"));
        assert!(error_msg.contains("timeout_seconds"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unparseable_config() {
        let result = parse_config("annotations: [1, 2");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
