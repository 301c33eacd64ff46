use super::*;
use crate::attrib::tokenizer::BLOCK_SEPARATOR;
use std::path::PathBuf;
use tempfile::TempDir;

/// Workspace with a host tree, two extensions and a reports directory.
///
/// `fts5` has a report with one attributed 5-line block, `spellfix` is a
/// single-file extension without any report.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("host/src")).unwrap();
    fs::create_dir_all(root.join("ext/fts5")).unwrap();
    fs::create_dir_all(root.join("reports")).unwrap();

    let body: String = (1..=40).map(|i| format!("int f{i}(void);\n")).collect();
    fs::write(root.join("host/src/main.c"), &body).unwrap();
    fs::write(root.join("ext/fts5/fts5.c"), &body).unwrap();
    fs::write(root.join("ext/fts5/fts5.h"), "#define X 1\n#define Y 2\n").unwrap();
    fs::write(root.join("ext/spellfix.c"), "int a;\nint b;\nint c;\n").unwrap();

    let report = format!(
        "Found a 5 line (60 tokens) duplication in the following files:\n\
         Starting at line 3 of {}\n\
         Starting at line 10 of {}\n\
         {BLOCK_SEPARATOR}\n",
        root.join("ext/fts5/fts5.c").display(),
        root.join("host/src/main.c").display(),
    );
    fs::write(root.join("reports/fts5.txt"), report).unwrap();

    let config = r#"
[host]
name = "sqlite"
source_dirs = ["host/src"]

[extensions]
fts5 = "ext/fts5"
spellfix = "ext/spellfix.c"
"#;
    let config_path = root.join("hostcopy.toml");
    fs::write(&config_path, config).unwrap();
    (dir, config_path)
}

#[test]
fn analyze_all_rows_in_name_order() {
    let (_dir, config_path) = workspace();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["fts5", "spellfix"]);
}

#[test]
fn analyzed_extension_row() {
    let (_dir, config_path) = workspace();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    let fts5 = &rows[0];
    assert_eq!(fts5.status, RowStatus::Ok);
    assert_eq!(fts5.total_lines, Some(42));
    assert_eq!(fts5.copied_lines, Some(5));
    assert!(fts5.error.is_none());
    assert!((fts5.percentage().unwrap() - 5.0 / 42.0 * 100.0).abs() < 1e-9);
}

#[test]
fn missing_report_row() {
    let (_dir, config_path) = workspace();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    let spellfix = &rows[1];
    assert_eq!(spellfix.status, RowStatus::Missing);
    assert_eq!(spellfix.total_lines, Some(3));
    assert_eq!(spellfix.copied_lines, None);
    assert_eq!(spellfix.percentage(), None);
}

#[test]
fn unreadable_extension_does_not_stop_batch() {
    let (dir, config_path) = workspace();
    fs::remove_dir_all(dir.path().join("ext/fts5")).unwrap();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, RowStatus::Error);
    assert!(rows[0].error.is_some());
    assert_eq!(rows[1].status, RowStatus::Missing);
}

#[test]
fn report_naming_missing_source_file_is_error_row() {
    let (dir, config_path) = workspace();
    fs::remove_file(dir.path().join("ext/fts5/fts5.c")).unwrap();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    assert_eq!(rows[0].status, RowStatus::Error);
    assert_eq!(rows[0].total_lines, Some(2));
    assert!(rows[0].error.as_deref().unwrap().contains("fts5.c"));
}

#[test]
fn unknown_extension_row() {
    let (_dir, config_path) = workspace();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let filter = config.source_filter().unwrap();
    let row = analyze_extension(&config, &filter, "nope", None);
    assert_eq!(row.status, RowStatus::Error);
}

#[test]
fn per_host_dir_reports_are_aggregated() {
    let (dir, config_path) = workspace();
    let root = dir.path();
    fs::remove_file(root.join("reports/fts5.txt")).unwrap();
    fs::create_dir_all(root.join("reports/fts5")).unwrap();

    let ext_file = root.join("ext/fts5/fts5.c");
    let host_file = root.join("host/src/main.c");
    for (name, start) in [("a.txt", 1), ("b.txt", 20)] {
        let report = format!(
            "Found a 4 line (50 tokens) duplication in the following files:\n\
             Starting at line {start} of {}\n\
             Starting at line 1 of {}\n",
            ext_file.display(),
            host_file.display(),
        );
        fs::write(root.join("reports/fts5").join(name), report).unwrap();
    }
    fs::write(root.join("reports/fts5/notes.md"), "ignored").unwrap();

    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();
    assert_eq!(rows[0].copied_lines, Some(8));
}

#[test]
fn blocks_written_per_extension() {
    let (dir, config_path) = workspace();
    let out = dir.path().join("blocks");
    fs::create_dir_all(&out).unwrap();
    let config = AnalysisConfig::load(&config_path).unwrap();
    analyze_all(&config, Some(out.as_path())).unwrap();

    assert!(out.join("fts5_blocks.txt").exists());
    assert!(!out.join("spellfix_blocks.txt").exists());
}

#[test]
fn run_text_and_json() {
    let (dir, config_path) = workspace();
    run(&config_path, false, None).unwrap();
    run(&config_path, true, None).unwrap();

    let out = dir.path().join("new/blocks");
    run(&config_path, false, Some(out.as_path())).unwrap();
    assert!(out.join("fts5_blocks.txt").exists());
}

#[test]
fn run_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    assert!(run(&dir.path().join("none.toml"), false, None).is_err());
}

#[test]
fn row_status_names() {
    assert_eq!(RowStatus::Ok.as_str(), "ok");
    assert_eq!(RowStatus::Missing.as_str(), "missing");
    assert_eq!(RowStatus::Error.as_str(), "error");
}

#[test]
fn blocks_write_failure_marks_row() {
    let (dir, config_path) = workspace();
    let out = dir.path().join("blocks");
    // A directory where the blocks file should go makes the write fail.
    fs::create_dir_all(out.join("fts5_blocks.txt")).unwrap();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, Some(out.as_path())).unwrap();

    let fts5 = &rows[0];
    assert_eq!(fts5.status, RowStatus::Error);
    assert_eq!(fts5.copied_lines, Some(5));
    assert!(fts5.error.as_deref().unwrap().contains("fts5_blocks.txt"));
    assert_eq!(rows[1].status, RowStatus::Missing);
}

fn with_kind(config_path: &Path, extra: &str) {
    let text = fs::read_to_string(config_path).unwrap();
    let text = text.replace("name = \"sqlite\"\n", "name = \"sqlite\"\nkind = \"sqlite\"\n");
    fs::write(config_path, format!("{text}{extra}")).unwrap();
}

#[test]
fn capabilities_detected_per_extension() {
    let (dir, config_path) = workspace();
    fs::write(
        dir.path().join("ext/fts5/fts5_vtab.c"),
        "  rc = sqlite3_declare_vtab(db, zSql);\n",
    )
    .unwrap();
    with_kind(&config_path, "");

    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    assert_eq!(rows[0].capabilities.get("storage_manager"), Some(true));
    assert_eq!(rows[0].capabilities.get("function"), Some(false));
    assert_eq!(rows[1].capabilities.get("storage_manager"), Some(false));
}

#[test]
fn declared_capabilities_override_detection() {
    let (dir, config_path) = workspace();
    fs::write(
        dir.path().join("ext/fts5/fts5_vtab.c"),
        "  rc = sqlite3_declare_vtab(db, zSql);\n",
    )
    .unwrap();
    with_kind(&config_path, "\n[capabilities]\nfts5 = [\"function\"]\n");

    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();

    assert_eq!(rows[0].capabilities.get("function"), Some(true));
    assert_eq!(rows[0].capabilities.get("storage_manager"), Some(false));
}

#[test]
fn generic_host_rows_have_no_capabilities() {
    let (_dir, config_path) = workspace();
    let config = AnalysisConfig::load(&config_path).unwrap();
    let rows = analyze_all(&config, None).unwrap();
    assert!(rows.iter().all(|r| r.capabilities.is_empty()));
}
