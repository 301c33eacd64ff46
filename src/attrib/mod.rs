//! Copied-code attribution from duplicate-detector reports.
//!
//! ## Pipeline
//!
//! **Tokenize:** the report is split on the detector's separator line and
//! each block is parsed into a header (lines per occurrence) and its
//! occurrences, in report order. Blocks without a header are skipped.
//!
//! **Scope:** occurrences are located (relative paths joined onto the base
//! directory) and only those inside the extension are kept, provided the
//! block qualifies under the configured [`ScopeMode`].
//!
//! **Resolve:** each kept occurrence becomes an inclusive 0-based range,
//! clipped to the file's real length. Only extension files are read.
//!
//! **Merge and count:** ranges are merged per file into a minimal cover
//! and the covered lines are summed.

pub mod accountant;
pub mod merger;
pub mod resolver;
pub mod scope;
pub mod tokenizer;

mod report;

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AttribError, Result};
use crate::loc::count_source_lines;
use crate::util::read_report;
use crate::walk::SourceFilter;
use accountant::{per_file, total_copied_lines};
use merger::MergedIntervalMap;
use report::{CopiedMetrics, print_detailed, print_json, print_summary};
use resolver::{CachedLineCounter, LineCounter, resolve_occurrence};
use tokenizer::{BLOCK_SEPARATOR, parse_block, split_blocks};

pub use scope::{Scope, ScopeMode};

/// Inclusive, 0-based line range within one file. [`LineRange::new`]
/// guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..={end}");
        Self { start, end }
    }

    /// Number of lines covered, both ends included. An inverted range built
    /// through the public fields covers nothing.
    pub fn line_count(&self) -> usize {
        self.end
            .checked_sub(self.start)
            .map_or(0, |span| span.saturating_add(1))
    }
}

/// One physical location of a duplicated fragment, as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub path: PathBuf,
    pub start_line: usize, // 1-based
}

/// One reported duplication group. Every occurrence spans `line_count` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationBlock {
    pub line_count: usize,
    pub token_count: usize,
    pub occurrences: Vec<Occurrence>,
}

/// How the blocks of the consumed reports were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    pub seen: usize,
    pub malformed: usize,
    pub attributed: usize,
}

/// Result of attributing one extension.
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    pub intervals: MergedIntervalMap,
    pub copied_lines: usize,
    /// Sum of attributed range lengths before merging.
    pub raw_lines: usize,
    pub blocks: BlockStats,
    /// Raw text of every attributed block, in report order.
    pub attributed_blocks: Vec<String>,
}

/// Accumulates attributed ranges over one or more reports for a single
/// extension. Reports for the same extension (e.g. one detector run per host
/// directory) can be fed one after another; merging happens in `finish`.
pub struct Attributor<'s, C: LineCounter = CachedLineCounter> {
    scope: &'s Scope,
    counter: C,
    raw: BTreeMap<PathBuf, Vec<LineRange>>,
    stats: BlockStats,
    attributed_blocks: Vec<String>,
}

impl<'s> Attributor<'s, CachedLineCounter> {
    pub fn new(scope: &'s Scope) -> Self {
        Self::with_counter(scope, CachedLineCounter::new())
    }
}

impl<'s, C: LineCounter> Attributor<'s, C> {
    pub fn with_counter(scope: &'s Scope, counter: C) -> Self {
        Self {
            scope,
            counter,
            raw: BTreeMap::new(),
            stats: BlockStats::default(),
            attributed_blocks: Vec::new(),
        }
    }

    /// Consume one detector report.
    ///
    /// Malformed blocks are counted and skipped. An extension file that
    /// cannot be read aborts with `AttribError::SourceRead`.
    pub fn feed(&mut self, report: &str) -> Result<()> {
        for raw_block in split_blocks(report) {
            self.stats.seen += 1;

            let Some(block) = parse_block(raw_block) else {
                self.stats.malformed += 1;
                continue;
            };

            let selected = self.scope.select(&block);
            if selected.is_empty() {
                continue;
            }

            for (path, occurrence) in selected {
                if let Some(range) = resolve_occurrence(
                    &path,
                    occurrence.start_line,
                    block.line_count,
                    &mut self.counter,
                )? {
                    self.raw.entry(path).or_default().push(range);
                }
            }

            self.stats.attributed += 1;
            self.attributed_blocks.push(raw_block.to_string());
        }
        Ok(())
    }

    pub fn finish(self) -> Attribution {
        let raw_lines: usize = self.raw.values().flatten().map(LineRange::line_count).sum();
        let intervals = MergedIntervalMap::from_raw(self.raw);
        let copied_lines = total_copied_lines(&intervals);

        info!(
            extension = %self.scope.extension().display(),
            copied_lines,
            raw_lines,
            files = intervals.file_count(),
            blocks = self.stats.seen,
            attributed = self.stats.attributed,
            malformed = self.stats.malformed,
            "attribution complete"
        );

        if self.stats.attributed == 0 && self.stats.seen > self.stats.malformed {
            warn!(
                extension = %self.scope.extension().display(),
                blocks = self.stats.seen - self.stats.malformed,
                "no block touched the extension; check that report paths and scope paths name the same tree"
            );
        }

        Attribution {
            intervals,
            copied_lines,
            raw_lines,
            blocks: self.stats,
            attributed_blocks: self.attributed_blocks,
        }
    }
}

/// Attribute a single report.
pub fn attribute(report: &str, scope: &Scope) -> Result<Attribution> {
    let mut attributor = Attributor::new(scope);
    attributor.feed(report)?;
    Ok(attributor.finish())
}

/// Attribute every report in `reports` to the same extension.
pub fn attribute_reports(reports: &[PathBuf], scope: &Scope) -> Result<Attribution> {
    let mut attributor = Attributor::new(scope);
    for path in reports {
        debug!(report = %path.display(), "reading detector report");
        let text = read_report(path)?;
        attributor.feed(&text)?;
    }
    Ok(attributor.finish())
}

/// Write each attributed block followed by the separator line, the way the
/// detector printed them. Nothing is written when no block was attributed;
/// returns whether the file was created.
pub fn write_attributed_blocks(path: &Path, blocks: &[String]) -> Result<bool> {
    if blocks.is_empty() {
        return Ok(false);
    }
    let mut out = String::new();
    for block in blocks {
        out.push_str(block);
        out.push_str(BLOCK_SEPARATOR);
        out.push_str("\n\n");
    }
    fs::write(path, out).map_err(|source| AttribError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Entry point of `hc attribute`.
pub fn run(
    reports: &[PathBuf],
    scope: &Scope,
    filter: &SourceFilter,
    show_intervals: bool,
    json: bool,
    blocks_out: Option<&Path>,
) -> std::result::Result<(), Box<dyn Error>> {
    let attribution = attribute_reports(reports, scope)?;
    let totals = count_source_lines(scope.extension(), filter)?;

    if let Some(out) = blocks_out
        && write_attributed_blocks(out, &attribution.attributed_blocks)?
    {
        info!(path = %out.display(), "wrote attributed blocks");
    }

    let metrics = CopiedMetrics::new(&attribution, totals.lines);
    let files = per_file(&attribution.intervals);

    if json {
        print_json(&metrics, scope, &files)?;
    } else if show_intervals {
        print_detailed(&metrics, scope, &files);
    } else {
        print_summary(&metrics, scope);
    }

    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
