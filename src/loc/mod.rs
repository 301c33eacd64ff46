//! Total source lines of an extension: the denominator of the copied
//! percentage.

mod counter;
mod report;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

use tracing::{debug, warn};

use crate::capability::{CapabilityScanner, HostKind};
use crate::error::{AttribError, Result};
use crate::util::read_source_lines;
use crate::walk::{self, SourceFilter};
use counter::count_lines;
use report::{ExtensionReport, print_json, print_report};

/// Line and file totals over an extension's source files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTotals {
    pub files: usize,
    pub lines: usize,
    pub binary_files: usize,
    /// Files and lines per file extension (`"c"`, `"h"`, ...; `""` for none).
    pub by_extension: BTreeMap<String, (usize, usize)>,
}

impl SourceTotals {
    fn add(&mut self, path: &Path, lines: usize) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let entry = self.by_extension.entry(ext).or_default();
        entry.0 += 1;
        entry.1 += lines;
        self.files += 1;
        self.lines += lines;
    }
}

/// Count the lines of every source file under `path`.
///
/// `path` may name a single file, which is counted whatever its name.
/// Inside a directory only files accepted by `filter` count; unreadable
/// entries are reported and skipped. A missing `path` is an error.
pub fn count_source_lines(path: &Path, filter: &SourceFilter) -> Result<SourceTotals> {
    count_and_scan(path, filter, &mut CapabilityScanner::new(HostKind::Generic))
}

/// [`count_source_lines`], also feeding every file the scanner accepts to
/// it within the same walk.
pub fn count_and_scan(
    path: &Path,
    filter: &SourceFilter,
    scanner: &mut CapabilityScanner,
) -> Result<SourceTotals> {
    let mut totals = SourceTotals::default();

    let metadata = std::fs::metadata(path).map_err(|source| AttribError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_file() {
        match count_lines(path) {
            Ok(Some(lines)) => totals.add(path, lines),
            Ok(None) => totals.binary_files += 1,
            Err(source) => {
                return Err(AttribError::SourceRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        scan_file(scanner, path, true);
        return Ok(totals);
    }

    for entry in walk::walk(path) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let file_path = entry.path();
        let is_source = filter.is_source(file_path);
        scan_file(scanner, file_path, is_source);
        if !is_source {
            continue;
        }

        match count_lines(file_path) {
            Ok(Some(lines)) => totals.add(file_path, lines),
            Ok(None) => {
                debug!(path = %file_path.display(), "skipping binary file");
                totals.binary_files += 1;
            }
            Err(err) => {
                warn!("{}: {err}", file_path.display());
            }
        }
    }

    Ok(totals)
}

fn scan_file(scanner: &mut CapabilityScanner, path: &Path, is_source: bool) {
    if !scanner.accepts(path, is_source) {
        return;
    }
    match read_source_lines(path) {
        Ok(lines) => scanner.scan(path, &lines),
        Err(err) => warn!("{}: {err}", path.display()),
    }
}

/// Entry point of `hc loc`.
pub fn run(
    path: &Path,
    filter: &SourceFilter,
    json: bool,
) -> std::result::Result<(), Box<dyn Error>> {
    let totals = count_source_lines(path, filter)?;

    let reports: Vec<ExtensionReport> = totals
        .by_extension
        .iter()
        .map(|(ext, (files, lines))| ExtensionReport {
            extension: ext.clone(),
            files: *files,
            lines: *lines,
        })
        .collect();

    if json {
        print_json(reports, totals.binary_files)?;
    } else if reports.is_empty() {
        println!("No source files found.");
    } else {
        print_report(reports, totals.binary_files);
    }

    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
