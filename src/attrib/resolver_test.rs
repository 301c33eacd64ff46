use super::*;
use std::fs;

/// In-memory counter for tests that don't need files on disk.
struct FixedCounter(HashMap<PathBuf, usize>);

impl FixedCounter {
    fn with(entries: &[(&str, usize)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(p, n)| (PathBuf::from(p), *n))
                .collect(),
        )
    }
}

impl LineCounter for FixedCounter {
    fn total_lines(&mut self, path: &Path) -> Result<usize> {
        self.0
            .get(path)
            .copied()
            .ok_or_else(|| AttribError::SourceRead {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

// ── clip_range ──────────────────────────────────────────────────────

#[test]
fn clip_inside_file() {
    assert_eq!(clip_range(10, 5, 1000), Some(LineRange::new(9, 13)));
}

#[test]
fn clip_first_line() {
    assert_eq!(clip_range(1, 1, 1), Some(LineRange::new(0, 0)));
}

#[test]
fn clip_at_end_of_file() {
    // 5 lines starting at line 498 of a 500-line file.
    assert_eq!(clip_range(498, 5, 500), Some(LineRange::new(497, 499)));
}

#[test]
fn clip_exactly_fits() {
    assert_eq!(clip_range(496, 5, 500), Some(LineRange::new(495, 499)));
}

#[test]
fn clip_start_past_end_of_file() {
    assert_eq!(clip_range(600, 5, 500), None);
    assert_eq!(clip_range(501, 1, 500), None);
}

#[test]
fn clip_empty_file() {
    assert_eq!(clip_range(1, 5, 0), None);
}

#[test]
fn clip_line_zero_treated_as_first_line() {
    assert_eq!(clip_range(0, 3, 10), Some(LineRange::new(0, 2)));
}

#[test]
fn clip_huge_count_does_not_overflow() {
    assert_eq!(
        clip_range(usize::MAX, usize::MAX, 10),
        None,
        "start past end of file"
    );
    assert_eq!(clip_range(1, usize::MAX, 10), Some(LineRange::new(0, 9)));
}

#[test]
fn clipped_length_never_exceeds_count() {
    for total in [1usize, 3, 10, 50] {
        for start in 1..=total + 2 {
            for count in 1..=12 {
                if let Some(range) = clip_range(start, count, total) {
                    assert!(range.line_count() <= count);
                    assert!(range.end < total);
                }
            }
        }
    }
}

// ── resolve_occurrence ──────────────────────────────────────────────

#[test]
fn resolve_with_fixed_counter() {
    let mut counter = FixedCounter::with(&[("/ext/foo.c", 100)]);
    let range = resolve_occurrence(Path::new("/ext/foo.c"), 98, 5, &mut counter).unwrap();
    assert_eq!(range, Some(LineRange::new(97, 99)));
}

#[test]
fn resolve_unknown_file_is_error() {
    let mut counter = FixedCounter::with(&[]);
    let err = resolve_occurrence(Path::new("/ext/gone.c"), 1, 5, &mut counter).unwrap_err();
    assert!(matches!(err, AttribError::SourceRead { .. }));
}

#[test]
fn resolve_past_end_is_none() {
    let mut counter = FixedCounter::with(&[("/ext/foo.c", 10)]);
    let range = resolve_occurrence(Path::new("/ext/foo.c"), 20, 5, &mut counter).unwrap();
    assert_eq!(range, None);
}

// ── CachedLineCounter ───────────────────────────────────────────────

#[test]
fn cached_counter_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.c");
    fs::write(&file, "one\ntwo\nthree\n").unwrap();

    let mut counter = CachedLineCounter::new();
    assert_eq!(counter.total_lines(&file).unwrap(), 3);
}

#[test]
fn cached_counter_counts_unterminated_last_line() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.c");
    fs::write(&file, "one\ntwo").unwrap();

    let mut counter = CachedLineCounter::new();
    assert_eq!(counter.total_lines(&file).unwrap(), 2);
}

#[test]
fn cached_counter_keeps_first_count() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.c");
    fs::write(&file, "one\ntwo\n").unwrap();

    let mut counter = CachedLineCounter::new();
    assert_eq!(counter.total_lines(&file).unwrap(), 2);

    fs::write(&file, "one\ntwo\nthree\nfour\n").unwrap();
    assert_eq!(counter.total_lines(&file).unwrap(), 2);
}

#[test]
fn cached_counter_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("missing.c");

    let mut counter = CachedLineCounter::new();
    match counter.total_lines(&file) {
        Err(AttribError::SourceRead { path, .. }) => assert_eq!(path, file),
        other => panic!("expected SourceRead, got {other:?}"),
    }
}
