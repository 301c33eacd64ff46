use serde::Serialize;

use super::{ExtensionRow, RowStatus};
use crate::config::AnalysisConfig;
use crate::report_helpers;

fn cell(value: Option<usize>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn pct_cell(row: &ExtensionRow) -> String {
    row.percentage()
        .map_or_else(|| "?".to_string(), |p| format!("{p:.1}%"))
}

fn capability_cell(row: &ExtensionRow, capability: &str) -> &'static str {
    match row.capabilities.get(capability) {
        Some(true) => "yes",
        Some(false) => "no",
        None => "?",
    }
}

fn status_count(rows: &[ExtensionRow], status: RowStatus) -> usize {
    rows.iter().filter(|r| r.status == status).count()
}

pub fn print_report(config: &AnalysisConfig, rows: &[ExtensionRow]) {
    let capabilities = config.host.kind.capabilities();
    let cap_widths: Vec<usize> = capabilities.iter().map(|c| c.len().max(3)).collect();
    let width = rows
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("Extension".len());
    let table_width = width + 50 + cap_widths.iter().map(|w| w + 1).sum::<usize>();
    let separator = report_helpers::separator(table_width.max(72));

    println!("{separator}");
    println!(
        " Copied Code by Extension (host: {}, scope: {})",
        config.host.name,
        config.scope.as_str()
    );
    println!("{separator}");
    let mut header = format!(
        " {:<width$} {:>10} {:>10} {:>8}  {:<8}",
        "Extension", "Total LOC", "Copied", "Copied%", "Status"
    );
    for (cap, w) in capabilities.iter().zip(cap_widths.iter().copied()) {
        header.push_str(&format!(" {cap:>w$}"));
    }
    println!("{}", header.trim_end());
    println!("{separator}");

    for row in rows {
        let mut line = format!(
            " {:<width$} {:>10} {:>10} {:>8}  {:<8}",
            row.name,
            cell(row.total_lines),
            cell(row.copied_lines),
            pct_cell(row),
            row.status.as_str()
        );
        for (cap, w) in capabilities.iter().zip(cap_widths.iter().copied()) {
            line.push_str(&format!(" {:>w$}", capability_cell(row, cap)));
        }
        println!("{}", line.trim_end());
    }

    println!("{separator}");

    let copied: usize = rows.iter().filter_map(|r| r.copied_lines).sum();
    println!(" Extensions analyzed:  {:>10}", rows.len());
    println!(" Copied lines (known): {:>10}", copied);

    let missing = status_count(rows, RowStatus::Missing);
    if missing > 0 {
        println!(" Missing reports:      {:>10}", missing);
    }

    let failed: Vec<&ExtensionRow> = rows.iter().filter(|r| r.status == RowStatus::Error).collect();
    if !failed.is_empty() {
        println!();
        println!(" Failed:");
        for row in failed {
            println!(
                "   {}: {}",
                row.name,
                row.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("{separator}");
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    host: &'a str,
    host_kind: &'static str,
    scope: &'static str,
    extensions: Vec<JsonRow<'a>>,
    totals: JsonTotals,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    row: &'a ExtensionRow,
    copied_percentage: Option<f64>,
}

#[derive(Serialize)]
struct JsonTotals {
    extensions: usize,
    ok: usize,
    missing: usize,
    failed: usize,
    copied_lines: usize,
}

pub fn format_json(
    config: &AnalysisConfig,
    rows: &[ExtensionRow],
) -> Result<String, Box<dyn std::error::Error>> {
    let output = JsonOutput {
        host: &config.host.name,
        host_kind: config.host.kind.as_str(),
        scope: config.scope.as_str(),
        extensions: rows
            .iter()
            .map(|row| JsonRow {
                row,
                copied_percentage: row.percentage(),
            })
            .collect(),
        totals: JsonTotals {
            extensions: rows.len(),
            ok: status_count(rows, RowStatus::Ok),
            missing: status_count(rows, RowStatus::Missing),
            failed: status_count(rows, RowStatus::Error),
            copied_lines: rows.iter().filter_map(|r| r.copied_lines).sum(),
        },
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn print_json(
    config: &AnalysisConfig,
    rows: &[ExtensionRow],
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_json(config, rows)?);
    Ok(())
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
