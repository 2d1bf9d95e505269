// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::records::LogRecord;

/// 0-based source line index.
pub type LineIndex = usize;

/// Every record whose range covers one source line, in arrival order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub index: LineIndex,
    pub records: Vec<LogRecord>,
}

impl Line {
    pub fn new(index: LineIndex) -> Self {
        Self {
            index,
            records: Vec::new(),
        }
    }

    /// Group records by the lines they cover. A record spanning several lines lands on each.
    pub fn for_records<'a, I>(records: I) -> BTreeMap<LineIndex, Line>
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        let mut lines = BTreeMap::new();
        for record in records {
            assign(&mut lines, record);
        }
        lines
    }
}

/// Add `record` to every line it covers, creating lines on first reference.
///
/// Returns the indices touched.
pub fn assign(
    lines: &mut BTreeMap<LineIndex, Line>,
    record: &LogRecord,
) -> std::ops::RangeInclusive<LineIndex> {
    let indices = record.range.line_indices();
    for index in indices.clone() {
        lines
            .entry(index)
            .or_insert_with(|| Line::new(index))
            .records
            .push(record.clone());
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Api, SourceRange};

    fn record(sl: u32, el: u32, object: &str) -> LogRecord {
        LogRecord::new(Api::Log, SourceRange::new(sl, el, 1, 1)).with_object(object)
    }

    #[test]
    fn test_record_lands_on_every_covered_line_and_no_other() {
        let spanning = record(2, 4, "a");
        let lines = Line::for_records([&spanning]);

        assert_eq!(lines.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        for line in lines.values() {
            assert_eq!(line.records, vec![spanning.clone()]);
        }
    }

    #[test]
    fn test_arrival_order_is_kept_per_line() {
        let records = vec![record(1, 1, "r1"), record(1, 2, "r2"), record(1, 1, "r3")];
        let lines = Line::for_records(&records);

        let first: Vec<_> = lines[&0]
            .records
            .iter()
            .map(|r| r.object_description.clone().unwrap())
            .collect();
        assert_eq!(first, vec!["r1", "r2", "r3"]);
        assert_eq!(lines[&1].records.len(), 1);
        assert_eq!(lines[&1].index, 1);
    }
}
