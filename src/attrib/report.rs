use std::path::PathBuf;

use serde::Serialize;

use super::accountant::FileCopied;
use super::scope::Scope;
use super::{Attribution, LineRange};
use crate::report_helpers;

/// Summary metrics for one extension's attribution.
#[derive(Debug, Serialize)]
pub struct CopiedMetrics {
    pub total_source_lines: usize,
    pub copied_lines: usize,
    pub raw_lines: usize,
    pub files_with_copies: usize,
    pub blocks_seen: usize,
    pub blocks_malformed: usize,
    pub blocks_attributed: usize,
}

impl CopiedMetrics {
    pub fn new(attribution: &Attribution, total_source_lines: usize) -> Self {
        Self {
            total_source_lines,
            copied_lines: attribution.copied_lines,
            raw_lines: attribution.raw_lines,
            files_with_copies: attribution.intervals.file_count(),
            blocks_seen: attribution.blocks.seen,
            blocks_malformed: attribution.blocks.malformed,
            blocks_attributed: attribution.blocks.attributed,
        }
    }

    pub fn percentage(&self) -> f64 {
        report_helpers::percentage(self.copied_lines, self.total_source_lines)
    }

    /// Lines that overlapping fragments would have counted twice.
    pub fn overlap_lines(&self) -> usize {
        self.raw_lines.saturating_sub(self.copied_lines)
    }
}

fn hosts_label(scope: &Scope) -> String {
    if scope.hosts().is_empty() {
        return "-".to_string();
    }
    scope
        .hosts()
        .iter()
        .map(|h| h.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ranges as 1-based line spans, the way editors number lines.
fn format_ranges(ranges: &[LineRange]) -> String {
    ranges
        .iter()
        .map(|r| {
            if r.start == r.end {
                format!("{}", r.start + 1)
            } else {
                format!("{}-{}", r.start + 1, r.end + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_summary(metrics: &CopiedMetrics, scope: &Scope) {
    let separator = report_helpers::separator(68);

    println!("{separator}");
    println!(" Copied Code Attribution");
    println!();
    println!(" Extension: {}", scope.extension().display());
    println!(" Host:      {}", hosts_label(scope));
    println!(" Scope:     {}", scope.mode().as_str());
    println!();
    println!(" Total source lines:   {:>42}", metrics.total_source_lines);
    println!(" Copied lines:         {:>42}", metrics.copied_lines);
    println!(" Copied:               {:>41.1}%", metrics.percentage());
    if metrics.overlap_lines() > 0 {
        println!(" Overlap removed:      {:>42}", metrics.overlap_lines());
    }
    println!();
    println!(" Blocks in report:     {:>42}", metrics.blocks_seen);
    println!(" Blocks attributed:    {:>42}", metrics.blocks_attributed);
    if metrics.blocks_malformed > 0 {
        println!(" Blocks skipped:       {:>42}", metrics.blocks_malformed);
    }
    println!(" Files with copies:    {:>42}", metrics.files_with_copies);
    println!("{separator}");
}

/// Print the summary followed by every file with its merged ranges.
pub fn print_detailed(metrics: &CopiedMetrics, scope: &Scope, files: &[FileCopied]) {
    print_summary(metrics, scope);

    if files.is_empty() {
        return;
    }

    let separator = report_helpers::separator(68);
    let width = report_helpers::max_path_width(files.iter().map(|f| f.path.as_path()), 4);

    println!();
    println!(" {:<width$} {:>8}  Lines", "File", "Copied");
    println!("{separator}");
    for file in files {
        println!(
            " {:<width$} {:>8}  {}",
            file.path.display(),
            file.copied_lines,
            format_ranges(&file.ranges)
        );
    }
    println!("{separator}");
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    extension: PathBuf,
    hosts: &'a [PathBuf],
    scope: &'static str,
    metrics: JsonMetrics,
    files: &'a [FileCopied],
}

#[derive(Serialize)]
struct JsonMetrics {
    total_source_lines: usize,
    copied_lines: usize,
    copied_percentage: f64,
    raw_lines: usize,
    files_with_copies: usize,
    blocks_seen: usize,
    blocks_malformed: usize,
    blocks_attributed: usize,
}

/// Serialize the attribution to pretty-printed JSON. Ranges stay 0-based
/// and inclusive.
pub fn format_json(
    metrics: &CopiedMetrics,
    scope: &Scope,
    files: &[FileCopied],
) -> Result<String, Box<dyn std::error::Error>> {
    let output = JsonOutput {
        extension: scope.extension().to_path_buf(),
        hosts: scope.hosts(),
        scope: scope.mode().as_str(),
        metrics: JsonMetrics {
            total_source_lines: metrics.total_source_lines,
            copied_lines: metrics.copied_lines,
            copied_percentage: metrics.percentage(),
            raw_lines: metrics.raw_lines,
            files_with_copies: metrics.files_with_copies,
            blocks_seen: metrics.blocks_seen,
            blocks_malformed: metrics.blocks_malformed,
            blocks_attributed: metrics.blocks_attributed,
        },
        files,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn print_json(
    metrics: &CopiedMetrics,
    scope: &Scope,
    files: &[FileCopied],
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_json(metrics, scope, files)?);
    Ok(())
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
