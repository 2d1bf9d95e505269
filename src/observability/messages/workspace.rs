// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for scratch workspace preparation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// A scratch workspace was rebuilt from the bundle and the template.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use playground_runner::observability::messages::workspace::WorkspacePrepared;
/// use std::path::Path;
///
/// let msg = WorkspacePrepared {
///     scratch: Path::new("/tmp/swift-playground-ab12"),
///     mirrored: 4,
///     overlaid: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WorkspacePrepared<'a> {
    pub scratch: &'a Path,
    pub mirrored: usize,
    pub overlaid: usize,
}

impl Display for WorkspacePrepared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Prepared workspace '{}': {} bundle files, {} template files",
            self.scratch.display(),
            self.mirrored,
            self.overlaid
        )
    }
}

impl StructuredLog for WorkspacePrepared<'_> {
    fn log(&self) {
        tracing::info!(
            scratch = %self.scratch.display(),
            mirrored = self.mirrored,
            overlaid = self.overlaid,
            "{}", self
        );
    }
}

/// A template file was skipped because the bundle already provides it.
///
/// # Log Level
/// `debug!` - Detail
pub struct TemplateFileShadowed<'a> {
    pub relative: &'a Path,
}

impl Display for TemplateFileShadowed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template file '{}' shadowed by bundle file",
            self.relative.display()
        )
    }
}
