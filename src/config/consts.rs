// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Marker appended to annotations cut short by truncation
pub const DEFAULT_ELLIPSIS: &str = " ...";
/// Default maximum annotation length in characters
pub const DEFAULT_TRUNCATION_LENGTH: usize = 60;
/// File name suffix identifying a playground bundle directory
pub const BUNDLE_SUFFIX: &str = ".playground";
/// Prefix of scratch workspace directory names under the storage root
pub const WORKSPACE_PREFIX: &str = "swift-playground-";
/// The bundle's designated entry file
pub const DEFAULT_ENTRY_FILE: &str = "Contents.swift";
/// Directory holding compiled sources inside the workspace
pub const DEFAULT_SOURCES_DIR: &str = "Sources";
/// Canonical main-entry file; top-level code is only allowed in this file
pub const DEFAULT_MAIN_FILE: &str = "main.swift";
/// Subtrees never mirrored into the workspace (build artifacts, IDE state)
pub const DEFAULT_EXCLUDES: &[&str] = &[".build", ".swiftpm", "*.xcworkspace", "xcuserdata"];
/// Build tool products directory, relative to the workspace
pub const BUILD_PRODUCTS_DIR: &str = ".build/debug";
/// Widest source range, in lines, a single event may cover
pub const MAX_RECORD_SPAN_LINES: u32 = 10_000;
/// File descriptor the executed program writes its event stream to
pub const AUX_CHANNEL_FD: i32 = 3;
/// Extension of golden-output files stored next to a playground entry file
pub const EXPECTATION_EXTENSION: &str = "expectation";
