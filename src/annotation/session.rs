// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::annotation::line::assign;
use crate::annotation::{Line, LineIndex, TruncationPolicy};
use crate::config::AnnotationConfig;
use crate::records::LogRecord;

/// Annotations for one run, kept current as records arrive.
///
/// Only lines touched by a new record are re-rendered. The session is owned by whoever drives
/// the run and should be cleared before the next one.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSession {
    policy: TruncationPolicy,
    records: usize,
    lines: BTreeMap<LineIndex, Line>,
    annotations: BTreeMap<LineIndex, String>,
}

impl AnnotationSession {
    pub fn new(config: AnnotationConfig) -> Self {
        Self::with_policy(TruncationPolicy::from_config(&config))
    }

    pub fn with_policy(policy: TruncationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Add a record, returning the refreshed annotation of every line it covers.
    pub fn push(&mut self, record: LogRecord) -> Vec<(LineIndex, String)> {
        self.records += 1;
        assign(&mut self.lines, &record)
            .filter_map(|index| {
                let line = self.lines.get(&index)?;
                let text = self.policy.render(line);
                self.annotations.insert(index, text.clone());
                Some((index, text))
            })
            .collect()
    }

    pub fn extend<I: IntoIterator<Item = LogRecord>>(&mut self, records: I) {
        for record in records {
            self.push(record);
        }
    }

    pub fn annotations(&self) -> &BTreeMap<LineIndex, String> {
        &self.annotations
    }

    pub fn annotation(&self, index: LineIndex) -> Option<&str> {
        self.annotations.get(&index).map(String::as_str)
    }

    pub fn line(&self, index: LineIndex) -> Option<&Line> {
        self.lines.get(&index)
    }

    pub fn lines(&self) -> &BTreeMap<LineIndex, Line> {
        &self.lines
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn policy(&self) -> &TruncationPolicy {
        &self.policy
    }

    pub fn clear(&mut self) {
        self.records = 0;
        self.lines.clear();
        self.annotations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{decode_line, Api, SourceRange};

    #[test]
    fn test_single_named_record() {
        let record = decode_line(
            br#"{"api":"log","range":{"sl":3,"el":3,"sc":1,"ec":5},"name":"x","object":null}"#,
        )
        .unwrap()
        .unwrap();

        let mut session = AnnotationSession::default();
        let updated = session.push(record);

        assert_eq!(updated, vec![(2, "x".to_string())]);
        assert_eq!(session.annotation(2), Some("x"));
        assert_eq!(session.annotations().len(), 1);
    }

    #[test]
    fn test_repeated_logs_over_budget() {
        let mut session = AnnotationSession::with_policy(TruncationPolicy::with_max_length(9));
        for object in ["4200", "4300"] {
            session.push(LogRecord::new(Api::Log, SourceRange::lines(5, 5)).with_object(object));
        }

        assert_eq!(session.annotation(4), Some("(2 times)"));
        assert_eq!(session.line(4).unwrap().records.len(), 2);
    }

    #[test]
    fn test_push_refreshes_only_covered_lines() {
        let mut session = AnnotationSession::default();
        session.push(LogRecord::new(Api::Log, SourceRange::lines(1, 1)).with_object("a"));

        let updated =
            session.push(LogRecord::new(Api::Log, SourceRange::lines(1, 2)).with_object("b"));

        assert_eq!(
            updated,
            vec![(0, "a, b".to_string()), (1, "b".to_string())]
        );
        assert_eq!(session.record_count(), 2);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut session = AnnotationSession::new(AnnotationConfig::default());
        session.extend(vec![
            LogRecord::new(Api::Log, SourceRange::lines(1, 3)).with_name("y"),
        ]);
        assert_eq!(session.lines().len(), 3);

        session.clear();
        assert!(session.annotations().is_empty());
        assert!(session.lines().is_empty());
        assert_eq!(session.record_count(), 0);
    }
}
