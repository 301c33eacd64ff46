//! Report tokenizer: splits detector output into blocks and parses each one.
//!
//! A block is parsed structurally: the first header line fixes the line and
//! token counts, and every locator line after it becomes an occurrence in
//! report order. Locators that precede the header belong to no block and are
//! ignored. Everything that matches neither pattern is prose and dropped.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::{DuplicationBlock, Occurrence};

/// Separator line the detector prints between duplication blocks.
pub const BLOCK_SEPARATOR: &str =
    "=====================================================================";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Found a (\d+) line \((\d+) tokens\) duplication in the following files:")
        .expect("invalid header regex")
});

static LOCATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Starting at line (\d+) of (.+)$").expect("invalid locator regex"));

/// One classified report line.
#[derive(Debug, PartialEq, Eq)]
pub enum ReportLine<'a> {
    Header { line_count: usize, token_count: usize },
    Locator { start_line: usize, path: &'a str },
    Other,
}

/// Classify a single report line against the header and locator patterns.
///
/// Counts that do not fit in `usize` make the line unrecognizable rather
/// than wrapping.
pub fn classify_line(line: &str) -> ReportLine<'_> {
    let line = line.trim();

    if let Some(caps) = HEADER_RE.captures(line) {
        if let (Ok(line_count), Ok(token_count)) = (caps[1].parse(), caps[2].parse()) {
            return ReportLine::Header {
                line_count,
                token_count,
            };
        }
        return ReportLine::Other;
    }

    if let Some(caps) = LOCATOR_RE.captures(line)
        && let Ok(start_line) = caps[1].parse()
        && let Some(path) = caps.get(2)
    {
        return ReportLine::Locator {
            start_line,
            path: path.as_str().trim_end(),
        };
    }

    ReportLine::Other
}

/// Lazily split a full report into raw block strings.
///
/// Whitespace-only segments (before the first separator or after the last)
/// are not blocks and are dropped here.
pub fn split_blocks(report: &str) -> impl Iterator<Item = &str> {
    report
        .split(BLOCK_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
}

/// Parse one raw block. Returns `None` for a malformed block: no header,
/// or a header announcing zero duplicated lines.
pub fn parse_block(raw: &str) -> Option<DuplicationBlock> {
    let mut lines = raw.lines().map(classify_line);

    let Some((line_count, token_count)) = lines.by_ref().find_map(|line| match line {
        ReportLine::Header {
            line_count,
            token_count,
        } => Some((line_count, token_count)),
        _ => None,
    }) else {
        debug!("skipping block without a duplication header");
        return None;
    };

    if line_count == 0 {
        debug!("skipping block with a zero-line header");
        return None;
    }

    let occurrences: Vec<Occurrence> = lines
        .filter_map(|line| match line {
            ReportLine::Locator { start_line, path } => Some(Occurrence {
                path: PathBuf::from(path),
                start_line,
            }),
            _ => None,
        })
        .collect();

    trace!(
        line_count,
        token_count,
        occurrences = occurrences.len(),
        "parsed duplication block"
    );

    Some(DuplicationBlock {
        line_count,
        token_count,
        occurrences,
    })
}

#[cfg(test)]
#[path = "tokenizer_test.rs"]
mod tests;
