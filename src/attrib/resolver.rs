//! Fragment resolver: turns a reported occurrence into an inclusive,
//! 0-based line range clipped to the file as it exists on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::LineRange;
use crate::error::{AttribError, Result};
use crate::util::count_file_lines;

/// Source of ground-truth line counts for files named in a report.
pub trait LineCounter {
    fn total_lines(&mut self, path: &Path) -> Result<usize>;
}

/// Reads each file once per run and remembers its line count.
///
/// The file handle is dropped as soon as the count is known; only the
/// number is cached.
#[derive(Debug, Default)]
pub struct CachedLineCounter {
    counts: HashMap<PathBuf, usize>,
}

impl CachedLineCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineCounter for CachedLineCounter {
    fn total_lines(&mut self, path: &Path) -> Result<usize> {
        if let Some(&count) = self.counts.get(path) {
            return Ok(count);
        }
        let count = count_file_lines(path).map_err(|source| AttribError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.counts.insert(path.to_path_buf(), count);
        Ok(count)
    }
}

/// Compute `[start_line-1, start_line-1+line_count-1]` clipped to
/// `total_lines-1`.
///
/// Returns `None` when nothing of the fragment is left inside the file:
/// an empty file, or a start at or past end-of-file from a stale report.
pub fn clip_range(start_line: usize, line_count: usize, total_lines: usize) -> Option<LineRange> {
    let last_line = total_lines.checked_sub(1)?;
    let start = start_line.saturating_sub(1);
    let end = start
        .saturating_add(line_count.saturating_sub(1))
        .min(last_line);
    (start <= end).then_some(LineRange { start, end })
}

/// Resolve one occurrence of a `line_count`-line fragment in `path`.
///
/// A file that cannot be read is fatal: the caller cannot account for the
/// fragment without knowing how long the file really is.
pub fn resolve_occurrence(
    path: &Path,
    start_line: usize,
    line_count: usize,
    counter: &mut impl LineCounter,
) -> Result<Option<LineRange>> {
    let total_lines = counter.total_lines(path)?;
    let range = clip_range(start_line, line_count, total_lines);
    if range.is_none() {
        debug!(
            path = %path.display(),
            start_line,
            total_lines,
            "fragment lies past end of file, ignoring"
        );
    }
    Ok(range)
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
