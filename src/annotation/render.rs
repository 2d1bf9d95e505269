// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turning a [`Line`] into the single string shown beside it.
//!
//! The extended form lists every contributing record. When it does not fit, a line with
//! repeated `log` records collapses to `(N times)`; anything still too long is cut and gets the
//! ellipsis. Lengths are counted in characters.

use crate::annotation::Line;
use crate::config::consts::DEFAULT_ELLIPSIS;
use crate::config::AnnotationConfig;
use crate::records::{Api, LogRecord};

/// Display-length budget for one annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationPolicy {
    max_length: usize,
    ellipsis: String,
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self::from_config(&AnnotationConfig::default())
    }
}

impl TruncationPolicy {
    /// `max_length` below the ellipsis length is raised to it.
    pub fn new(max_length: usize, ellipsis: impl Into<String>) -> Self {
        let ellipsis = ellipsis.into();
        let floor = ellipsis.chars().count();
        Self {
            max_length: max_length.max(floor),
            ellipsis,
        }
    }

    pub fn from_config(config: &AnnotationConfig) -> Self {
        Self::new(config.truncation_length, config.ellipsis.as_str())
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self::new(max_length, DEFAULT_ELLIPSIS)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn ellipsis(&self) -> &str {
        &self.ellipsis
    }

    /// The annotation for `line`, never longer than [`TruncationPolicy::max_length`].
    pub fn render(&self, line: &Line) -> String {
        let mut representation = extended_representation(line);
        if self.fits(&representation) {
            return representation;
        }

        representation = short_representation(line);
        if self.fits(&representation) {
            return representation;
        }

        let keep = self.max_length - self.ellipsis.chars().count();
        let mut truncated: String = representation.chars().take(keep).collect();
        truncated.push_str(&self.ellipsis);
        truncated
    }

    fn fits(&self, text: &str) -> bool {
        text.chars().count() <= self.max_length
    }
}

/// Every contributing record in arrival order, joined with `", "`.
pub fn extended_representation(line: &Line) -> String {
    line.records
        .iter()
        .filter_map(record_text)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `(N times)` for a line with more than one `log` record; otherwise the extended form.
pub fn short_representation(line: &Line) -> String {
    let logs = line
        .records
        .iter()
        .filter(|record| record.api == Api::Log)
        .count();
    if logs > 1 {
        format!("({} times)", logs)
    } else {
        extended_representation(line)
    }
}

/// A record's contribution: the value when there is one, else the name.
fn record_text(record: &LogRecord) -> Option<String> {
    let object = non_empty(record.object_description.as_deref());
    let name = non_empty(record.name.as_deref());

    let text = match (name, object) {
        (_, Some(object)) => clean(object),
        (Some(name), None) => name.to_string(),
        (None, None) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Strip line breaks, then collapse runs of two or more whitespace characters to one space.
pub fn clean(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut pending: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
        if c.is_whitespace() {
            run += 1;
            pending.get_or_insert(c);
            continue;
        }
        flush_whitespace(&mut cleaned, &mut pending, &mut run);
        cleaned.push(c);
    }
    flush_whitespace(&mut cleaned, &mut pending, &mut run);
    cleaned
}

fn flush_whitespace(out: &mut String, pending: &mut Option<char>, run: &mut usize) {
    if let Some(first) = pending.take() {
        out.push(if *run > 1 { ' ' } else { first });
    }
    *run = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SourceRange;

    fn line_of(records: Vec<LogRecord>) -> Line {
        Line {
            index: 0,
            records,
        }
    }

    fn log(object: &str) -> LogRecord {
        LogRecord::new(Api::Log, SourceRange::lines(1, 1)).with_object(object)
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("a\nb"), "ab");
        assert_eq!(clean("a\r\n  b"), "a b");
        assert_eq!(clean("a \t b"), "a b");
        assert_eq!(clean("a\tb"), "a\tb");
        assert_eq!(clean("  lead"), " lead");
    }

    #[test]
    fn test_record_text_precedence() {
        let range = SourceRange::lines(1, 1);
        let both = LogRecord::new(Api::Log, range).with_name("x").with_object("42  \n");
        let name_only = LogRecord::new(Api::Log, range).with_name("x");
        let object_only = LogRecord::new(Api::Log, range).with_object("[1,\n 2]");
        let neither = LogRecord::new(Api::ScopeEntry, range);
        let blank = LogRecord::new(Api::Log, range).with_object("\n");

        assert_eq!(record_text(&both).as_deref(), Some("42 "));
        assert_eq!(record_text(&name_only).as_deref(), Some("x"));
        assert_eq!(record_text(&object_only).as_deref(), Some("[1, 2]"));
        assert_eq!(record_text(&neither), None);
        assert_eq!(record_text(&blank), None);

        let line = line_of(vec![neither, name_only, blank, object_only]);
        assert_eq!(extended_representation(&line), "x, [1, 2]");
    }

    #[test]
    fn test_repeated_logs_collapse_to_count() {
        let line = line_of(vec![log("4200"), log("4300")]);
        assert_eq!(extended_representation(&line), "4200, 4300");
        assert_eq!(short_representation(&line), "(2 times)");

        assert_eq!(TruncationPolicy::with_max_length(10).render(&line), "4200, 4300");
        assert_eq!(TruncationPolicy::with_max_length(9).render(&line), "(2 times)");
        // The count form is still held to the budget
        assert_eq!(TruncationPolicy::with_max_length(4).render(&line), " ...");
        assert_eq!(TruncationPolicy::with_max_length(8).render(&line), "(2 t ...");
    }

    #[test]
    fn test_single_log_never_uses_count() {
        let line = line_of(vec![log("a fairly long description of a value")]);
        let rendered = TruncationPolicy::with_max_length(12).render(&line);

        assert_eq!(rendered, "a fairly ...");
        assert!(!rendered.contains("times"));
    }

    #[test]
    fn test_only_log_records_are_counted() {
        let mut post = log("printed");
        post.api = Api::PostPrint;
        let line = line_of(vec![log("first value"), post]);

        assert_eq!(short_representation(&line), "first value, printed");
    }

    #[test]
    fn test_output_never_exceeds_max() {
        let records: Vec<_> = (0..8).map(|i| log(&format!("value-{}", i))).collect();
        let ellipsis_len = " ...".len();

        for count in 1..records.len() {
            let line = line_of(records[..count].to_vec());
            for max in ellipsis_len..40 {
                let rendered = TruncationPolicy::with_max_length(max).render(&line);
                assert!(
                    rendered.chars().count() <= max,
                    "{:?} exceeds {}",
                    rendered,
                    max
                );
            }
        }
    }

    #[test]
    fn test_max_is_clamped_to_ellipsis() {
        let policy = TruncationPolicy::with_max_length(1);
        assert_eq!(policy.max_length(), 4);
        assert_eq!(policy.render(&line_of(vec![log("long value")])), " ...");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let line = line_of(vec![log("ééééééééé")]);
        assert_eq!(TruncationPolicy::with_max_length(6).render(&line), "éé ...");
    }
}
