//! LOC accountant: the published "total copied lines of code" figure.

use std::path::PathBuf;

use serde::Serialize;

use super::LineRange;
use super::merger::MergedIntervalMap;

/// Copied lines attributed to a single extension file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCopied {
    pub path: PathBuf,
    pub copied_lines: usize,
    pub ranges: Vec<LineRange>,
}

/// Sum of inclusive range lengths.
pub fn covered_lines(ranges: &[LineRange]) -> usize {
    ranges.iter().map(LineRange::line_count).sum()
}

/// Total copied lines across every file of the map. Zero for an empty map.
pub fn total_copied_lines(map: &MergedIntervalMap) -> usize {
    map.iter().map(|(_, ranges)| covered_lines(ranges)).sum()
}

/// Per-file breakdown, largest contribution first, ties in path order.
pub fn per_file(map: &MergedIntervalMap) -> Vec<FileCopied> {
    let mut files: Vec<FileCopied> = map
        .iter()
        .map(|(path, ranges)| FileCopied {
            path: path.to_path_buf(),
            copied_lines: covered_lines(ranges),
            ranges: ranges.to_vec(),
        })
        .collect();
    files.sort_by(|a, b| {
        b.copied_lines
            .cmp(&a.copied_lines)
            .then_with(|| a.path.cmp(&b.path))
    });
    files
}

#[cfg(test)]
#[path = "accountant_test.rs"]
mod tests;
