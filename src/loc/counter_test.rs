use super::*;
use std::fs;

#[test]
fn counts_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.c");
    fs::write(&path, "int a;\n\n/* c */\nint b;").unwrap();
    assert_eq!(count_lines(&path).unwrap(), Some(4));
}

#[test]
fn binary_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blob.c");
    fs::write(&path, b"hello\x00world\n").unwrap();
    assert_eq!(count_lines(&path).unwrap(), None);
}

#[test]
fn empty_file_is_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.h");
    fs::write(&path, "").unwrap();
    assert_eq!(count_lines(&path).unwrap(), Some(0));
}

#[test]
fn missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(count_lines(&dir.path().join("gone.c")).is_err());
}

#[test]
fn large_file_past_binary_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.c");
    let content = "int x = 0;\n".repeat(1000);
    fs::write(&path, content).unwrap();
    assert_eq!(count_lines(&path).unwrap(), Some(1000));
}
