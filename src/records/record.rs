// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based line number as reported by the instrumented source.
pub type LineNumber = u32;
/// Column number; informational only.
pub type ColumnNumber = u32;

/// The instrumentation hook that produced a record.
///
/// The playground runtime prefixes its hook names with `builtin_`; both spellings are accepted
/// on the wire, and the short form is what gets written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Api {
    #[serde(rename = "log", alias = "builtin_log")]
    Log,
    #[serde(rename = "log_with_id", alias = "builtin_log_with_id")]
    LogWithId,
    #[serde(rename = "scope_entry", alias = "builtin_log_scope_entry")]
    ScopeEntry,
    #[serde(rename = "scope_exit", alias = "builtin_log_scope_exit")]
    ScopeExit,
    #[serde(rename = "post_print", alias = "builtin_postPrint")]
    PostPrint,
}

impl Api {
    /// Parse a wire tag, returning `None` for kinds this crate does not know about.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "log" | "builtin_log" => Some(Api::Log),
            "log_with_id" | "builtin_log_with_id" => Some(Api::LogWithId),
            "scope_entry" | "builtin_log_scope_entry" => Some(Api::ScopeEntry),
            "scope_exit" | "builtin_log_scope_exit" => Some(Api::ScopeExit),
            "post_print" | "builtin_postPrint" => Some(Api::PostPrint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Api::Log => "log",
            Api::LogWithId => "log_with_id",
            Api::ScopeEntry => "scope_entry",
            Api::ScopeExit => "scope_exit",
            Api::PostPrint => "post_print",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source span of a record. Wire names are the compact `sl`/`el`/`sc`/`ec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    #[serde(rename = "sl")]
    pub start_line: LineNumber,
    #[serde(rename = "el")]
    pub end_line: LineNumber,
    #[serde(rename = "sc")]
    pub start_column: ColumnNumber,
    #[serde(rename = "ec")]
    pub end_column: ColumnNumber,
}

impl SourceRange {
    pub fn new(
        start_line: LineNumber,
        end_line: LineNumber,
        start_column: ColumnNumber,
        end_column: ColumnNumber,
    ) -> Self {
        Self {
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }

    /// A range covering whole lines, columns zeroed.
    pub fn lines(start_line: LineNumber, end_line: LineNumber) -> Self {
        Self::new(start_line, end_line, 0, 0)
    }

    /// Line numbers start at 1 and the span must not run backwards.
    pub fn is_valid(&self) -> bool {
        self.start_line >= 1 && self.start_line <= self.end_line
    }

    /// 0-based line indices covered by this range, inclusive on both ends.
    pub fn line_indices(&self) -> std::ops::RangeInclusive<usize> {
        let start = self.start_line.saturating_sub(1) as usize;
        let end = self.end_line.saturating_sub(1) as usize;
        start..=end
    }
}

/// One event emitted by the instrumented program. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub api: Api,
    pub range: SourceRange,
    #[serde(rename = "object", default, skip_serializing_if = "Option::is_none")]
    pub object_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl LogRecord {
    pub fn new(api: Api, range: SourceRange) -> Self {
        Self {
            api,
            range,
            object_description: None,
            name: None,
            id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_object(mut self, description: impl Into<String>) -> Self {
        self.object_description = Some(description.into());
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
