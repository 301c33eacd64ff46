//! Registry run: attribute every configured extension against the host and
//! produce one row per extension.
//!
//! A failure for one extension (unreadable source, missing report, blocks
//! file that cannot be written) is recorded in its row; the remaining
//! extensions are still analyzed.

mod report;

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::attrib::{attribute_reports, write_attributed_blocks};
use crate::capability::{Capabilities, CapabilityScanner, HostKind};
use crate::config::AnalysisConfig;
use crate::loc::count_and_scan;
use crate::report_helpers;
use crate::walk::SourceFilter;
use report::{print_json, print_report};

/// Outcome of one extension's analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Ok,
    /// No detector report was found; copied lines are unknown.
    Missing,
    /// The row is incomplete or its outputs were not written; see the
    /// row's error message.
    Error,
}

impl RowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Ok => "ok",
            RowStatus::Missing => "missing",
            RowStatus::Error => "error",
        }
    }
}

/// One row of the batch report.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionRow {
    pub name: String,
    pub total_lines: Option<usize>,
    pub copied_lines: Option<usize>,
    pub status: RowStatus,
    /// Host extension points the extension uses; empty for a generic host.
    #[serde(skip_serializing_if = "Capabilities::is_empty")]
    pub capabilities: Capabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtensionRow {
    fn failed(name: &str, total_lines: Option<usize>, err: impl std::fmt::Display) -> Self {
        Self {
            name: name.to_string(),
            total_lines,
            copied_lines: None,
            status: RowStatus::Error,
            capabilities: Capabilities::default(),
            error: Some(err.to_string()),
        }
    }

    /// Copied share of the extension's source lines, when both are known.
    pub fn percentage(&self) -> Option<f64> {
        Some(report_helpers::percentage(
            self.copied_lines?,
            self.total_lines?,
        ))
    }
}

/// Analyze one registered extension.
pub fn analyze_extension(
    config: &AnalysisConfig,
    filter: &SourceFilter,
    name: &str,
    blocks_dir: Option<&Path>,
) -> ExtensionRow {
    let Some(scope) = config.scope_for(name) else {
        return ExtensionRow::failed(name, None, format!("unknown extension `{name}`"));
    };

    info!(extension = name, "analyzing extension");

    let declared = match config.declared_capabilities(name) {
        Ok(declared) => declared,
        Err(err) => return ExtensionRow::failed(name, None, err),
    };
    let mut scanner = CapabilityScanner::new(match declared {
        Some(_) => HostKind::Generic,
        None => config.host.kind,
    });

    let total_lines = match count_and_scan(scope.extension(), filter, &mut scanner) {
        Ok(totals) => totals.lines,
        Err(err) => {
            warn!(extension = name, "{err}");
            return ExtensionRow::failed(name, None, err);
        }
    };
    let capabilities = declared.unwrap_or_else(|| scanner.finish());

    let reports = config.report_paths(name);
    if reports.is_empty() {
        warn!(extension = name, "no detector report found");
        return ExtensionRow {
            name: name.to_string(),
            total_lines: Some(total_lines),
            copied_lines: None,
            status: RowStatus::Missing,
            capabilities,
            error: None,
        };
    }

    let attribution = match attribute_reports(&reports, &scope) {
        Ok(a) => a,
        Err(err) => {
            warn!(extension = name, "{err}");
            return ExtensionRow {
                capabilities,
                ..ExtensionRow::failed(name, Some(total_lines), err)
            };
        }
    };

    let mut row = ExtensionRow {
        name: name.to_string(),
        total_lines: Some(total_lines),
        copied_lines: Some(attribution.copied_lines),
        status: RowStatus::Ok,
        capabilities,
        error: None,
    };

    if let Some(dir) = blocks_dir {
        let path = dir.join(format!("{name}_blocks.txt"));
        if let Err(err) = write_attributed_blocks(&path, &attribution.attributed_blocks) {
            warn!(extension = name, "{err}");
            row.status = RowStatus::Error;
            row.error = Some(err.to_string());
        }
    }

    row
}

/// Analyze every registered extension, in name order.
pub fn analyze_all(
    config: &AnalysisConfig,
    blocks_dir: Option<&Path>,
) -> crate::error::Result<Vec<ExtensionRow>> {
    let filter = config.source_filter()?;
    Ok(config
        .extensions
        .keys()
        .map(|name| analyze_extension(config, &filter, name, blocks_dir))
        .collect())
}

/// Entry point of `hc batch`.
pub fn run(
    config_path: &Path,
    json: bool,
    blocks_dir: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let config = AnalysisConfig::load(config_path)?;

    if let Some(dir) = blocks_dir {
        fs::create_dir_all(dir)?;
    }

    let rows = analyze_all(&config, blocks_dir)?;

    if json {
        print_json(&config, &rows)?;
    } else {
        print_report(&config, &rows);
    }

    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
