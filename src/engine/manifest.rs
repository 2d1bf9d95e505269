// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Build introspection output.
//!
//! `swift package dump-package` prints a large JSON document; only the package name and the
//! target list matter here. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::consts::BUILD_PRODUCTS_DIR;
use crate::errors::ExecutionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDescription {
    pub name: String,
    /// `executable`, `regular`, `test`... as reported by the build tool
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<TargetDescription>,
}

impl PackageManifest {
    /// Parse the manifest stage's stdout.
    pub fn parse(bytes: &[u8]) -> Result<Self, ExecutionError> {
        serde_json::from_slice(bytes).map_err(|e| ExecutionError::Manifest {
            reason: format!("unreadable package description: {}", e),
        })
    }

    /// The playground package must describe exactly one target.
    pub fn single_target(&self) -> Result<&TargetDescription, ExecutionError> {
        match self.targets.as_slice() {
            [target] => Ok(target),
            targets => Err(ExecutionError::Manifest {
                reason: format!(
                    "package '{}' must have exactly one target, found {}",
                    self.name,
                    targets.len()
                ),
            }),
        }
    }

    /// Where the build stage leaves the executable for the single target.
    pub fn executable_path(&self, workspace: &Path) -> Result<PathBuf, ExecutionError> {
        let target = self.single_target()?;
        Ok(workspace.join(BUILD_PRODUCTS_DIR).join(&target.name))
    }
}
