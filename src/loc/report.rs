use serde::Serialize;

use crate::report_helpers;

/// Files and lines for one file extension.
#[derive(Debug, Serialize)]
pub struct ExtensionReport {
    pub extension: String,
    pub files: usize,
    pub lines: usize,
}

fn label(ext: &str) -> String {
    if ext.is_empty() {
        "(none)".to_string()
    } else {
        format!(".{ext}")
    }
}

pub fn print_report(mut reports: Vec<ExtensionReport>, binary_files: usize) {
    reports.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.extension.cmp(&b.extension)));

    let separator = report_helpers::separator(48);

    println!("{separator}");
    println!(" {:<20} {:>12} {:>12}", "Extension", "Files", "Lines");
    println!("{separator}");

    for r in &reports {
        println!(" {:<20} {:>12} {:>12}", label(&r.extension), r.files, r.lines);
    }

    let total_files: usize = reports.iter().map(|r| r.files).sum();
    let total_lines: usize = reports.iter().map(|r| r.lines).sum();

    println!("{separator}");
    println!(" {:<20} {:>12} {:>12}", "SUM:", total_files, total_lines);
    println!("{separator}");

    if binary_files > 0 {
        println!(" {binary_files} binary files skipped.");
    }
}

#[derive(Serialize)]
struct JsonOutput {
    extensions: Vec<ExtensionReport>,
    totals: JsonTotals,
}

#[derive(Serialize)]
struct JsonTotals {
    files: usize,
    lines: usize,
    binary_files: usize,
}

pub fn print_json(
    mut reports: Vec<ExtensionReport>,
    binary_files: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    reports.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.extension.cmp(&b.extension)));

    let totals = JsonTotals {
        files: reports.iter().map(|r| r.files).sum(),
        lines: reports.iter().map(|r| r.lines).sum(),
        binary_files,
    };

    report_helpers::print_json_stdout(&JsonOutput {
        extensions: reports,
        totals,
    })
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
