use super::*;

fn sample_reports() -> Vec<ExtensionReport> {
    vec![
        ExtensionReport {
            extension: "h".to_string(),
            files: 3,
            lines: 120,
        },
        ExtensionReport {
            extension: "c".to_string(),
            files: 5,
            lines: 900,
        },
    ]
}

#[test]
fn label_with_extension() {
    assert_eq!(label("cpp"), ".cpp");
}

#[test]
fn label_without_extension() {
    assert_eq!(label(""), "(none)");
}

#[test]
fn print_report_sorts_by_lines_descending() {
    // Should not panic
    print_report(sample_reports(), 0);
}

#[test]
fn print_report_empty() {
    print_report(vec![], 0);
}

#[test]
fn print_report_with_binary_files() {
    print_report(sample_reports(), 2);
}

#[test]
fn print_json_with_reports() {
    print_json(sample_reports(), 1).unwrap();
}

#[test]
fn print_json_empty() {
    print_json(vec![], 0).unwrap();
}
