use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::{AttribError, Result};

/// C and C++ source patterns counted when none are configured.
pub const DEFAULT_SOURCE_PATTERNS: &[&str] = &["*.h", "*.hh", "*.c", "*.cpp", "*.cc", "*.cxx"];

/// Decides which files count as extension source, by file name glob.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    set: GlobSet,
}

impl SourceFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| AttribError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| AttribError::InvalidPattern {
                pattern: patterns
                    .iter()
                    .map(|p| p.as_ref())
                    .collect::<Vec<_>>()
                    .join(","),
                source,
            })?;
        Ok(Self { set })
    }

    /// Filter for the default C/C++ patterns, or `patterns` when non-empty.
    pub fn from_patterns_or_default<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            Self::new(DEFAULT_SOURCE_PATTERNS)
        } else {
            Self::new(patterns)
        }
    }

    pub fn is_source(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.set.is_match(name))
    }
}

/// Build a walker over every file of an extension tree, skipping `.git`.
///
/// Ignore files are not honored: a vendored or generated file in the
/// extension's tree is still part of what the extension ships.
pub fn walk(path: &Path) -> ignore::Walk {
    WalkBuilder::new(path)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(|entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir()) && entry.file_name() == ".git")
        })
        .build()
}

#[cfg(test)]
#[path = "walk_test.rs"]
mod tests;
