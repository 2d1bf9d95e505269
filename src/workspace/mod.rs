// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scratch workspace preparation.

pub mod copy;
mod preparer;
pub mod walk;

pub use preparer::{copy_template_file, workspace_key, PreparedWorkspace, WorkspacePreparer};
pub use walk::{DirectoryWalk, NamePattern};
