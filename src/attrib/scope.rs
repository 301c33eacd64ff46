//! Scope filter: decides which occurrences of a block count as code the
//! extension copied from the host.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DuplicationBlock, Occurrence};
use crate::util::{absolute_path, normalize_path};

/// Block-level attribution policy.
///
/// Occurrences outside the extension are never attributed; the mode only
/// decides whether a block with an extension occurrence qualifies at all.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Any block with an occurrence in the extension.
    ExtensionOnly,
    /// The block must also have an occurrence in a host directory.
    #[default]
    HostSibling,
    /// Every occurrence is in the extension or the host, with at least one
    /// in the host. Rejects extension-vs-third-party duplication when the
    /// detector scanned more than two trees.
    Strict,
}

impl ScopeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeMode::ExtensionOnly => "extension-only",
            ScopeMode::HostSibling => "host-sibling",
            ScopeMode::Strict => "strict",
        }
    }
}

/// The `(extension, host)` pair one analysis run is parameterised by.
#[derive(Debug, Clone)]
pub struct Scope {
    extension: PathBuf,
    hosts: Vec<PathBuf>,
    base_dir: Option<PathBuf>,
    mode: ScopeMode,
}

impl Scope {
    /// `extension` may be a directory or a single source file. Relative
    /// paths are made absolute against the current directory.
    pub fn new<I, P>(extension: impl AsRef<Path>, hosts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            extension: absolute_path(extension.as_ref()),
            hosts: hosts
                .into_iter()
                .map(|h| absolute_path(h.as_ref()))
                .collect(),
            base_dir: None,
            mode: ScopeMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ScopeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Directory that relative paths in the report are relative to.
    pub fn with_base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(absolute_path(base_dir.as_ref()));
        self
    }

    pub fn extension(&self) -> &Path {
        &self.extension
    }

    pub fn hosts(&self) -> &[PathBuf] {
        &self.hosts
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// Map a path as printed by the detector to the absolute path used for
    /// scope checks and file reads. Relative paths are taken against the
    /// base directory, or the current directory when none is set.
    pub fn locate(&self, reported: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if reported.is_relative() => normalize_path(&base.join(reported)),
            _ => absolute_path(reported),
        }
    }

    pub fn in_extension(&self, located: &Path) -> bool {
        located.starts_with(&self.extension)
    }

    pub fn in_host(&self, located: &Path) -> bool {
        !self.in_extension(located) && self.hosts.iter().any(|h| located.starts_with(h))
    }

    /// Return the extension-side occurrences of `block` with their located
    /// paths, or nothing when the block does not qualify under the mode.
    pub fn select<'b>(&self, block: &'b DuplicationBlock) -> Vec<(PathBuf, &'b Occurrence)> {
        let located: Vec<(PathBuf, &Occurrence)> = block
            .occurrences
            .iter()
            .map(|occ| (self.locate(&occ.path), occ))
            .collect();

        let touches_host = located.iter().any(|(path, _)| self.in_host(path));
        let qualifies = match self.mode {
            ScopeMode::ExtensionOnly => true,
            ScopeMode::HostSibling => touches_host,
            ScopeMode::Strict => {
                touches_host
                    && located
                        .iter()
                        .all(|(path, _)| self.in_extension(path) || self.in_host(path))
            }
        };
        if !qualifies {
            return Vec::new();
        }

        located
            .into_iter()
            .filter(|(path, _)| self.in_extension(path))
            .collect()
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
