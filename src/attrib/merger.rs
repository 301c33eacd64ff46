//! Interval merger: per-file minimal cover of attributed line ranges.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::LineRange;

/// Merge ranges into an ordered, disjoint, non-adjacent cover.
///
/// Ranges are sorted by `(start, end)` first, so the result depends only on
/// the multiset of inputs. Touching ranges (`next.start == current.end + 1`)
/// are combined. Inverted ranges cover no line and are dropped.
pub fn merge_ranges(mut ranges: Vec<LineRange>) -> Vec<LineRange> {
    ranges.retain(|r| r.start <= r.end);
    ranges.sort_unstable();

    let mut merged: Vec<LineRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(current) if range.start <= current.end.saturating_add(1) => {
                current.end = current.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Per-file merged ranges, iterated in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedIntervalMap {
    files: BTreeMap<PathBuf, Vec<LineRange>>,
}

impl MergedIntervalMap {
    /// Merge raw per-file ranges. Files left with no range are dropped.
    pub fn from_raw(raw: BTreeMap<PathBuf, Vec<LineRange>>) -> Self {
        let files = raw
            .into_iter()
            .map(|(path, ranges)| (path, merge_ranges(ranges)))
            .filter(|(_, ranges)| !ranges.is_empty())
            .collect();
        Self { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn ranges(&self, path: &Path) -> Option<&[LineRange]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[LineRange])> {
        self.files
            .iter()
            .map(|(path, ranges)| (path.as_path(), ranges.as_slice()))
    }
}

#[cfg(test)]
#[path = "merger_test.rs"]
mod tests;
