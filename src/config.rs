//! Analysis configuration loaded from a TOML file.
//!
//! ```toml
//! reports_dir = "reports"
//! scope = "host-sibling"
//!
//! [host]
//! name = "sqlite"
//! kind = "sqlite"
//! source_dirs = ["sqlite_src"]
//!
//! [extensions]
//! fts5 = "ext/fts5"
//! spellfix = "ext/misc/spellfix.c"
//!
//! [capabilities]
//! spellfix = ["function"]
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file, and that directory is made absolute when the file is loaded.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::attrib::scope::{Scope, ScopeMode};
use crate::capability::{Capabilities, HostKind};
use crate::error::{AttribError, Result};
use crate::util::absolute_path;
use crate::walk::{DEFAULT_SOURCE_PATTERNS, SourceFilter};

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_source_patterns() -> Vec<String> {
    DEFAULT_SOURCE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

/// The host engine whose source extensions copy from.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub name: String,
    /// Engine family, for capability detection.
    #[serde(default)]
    pub kind: HostKind,
    pub source_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub host: HostConfig,

    /// Directory holding one detector report per extension.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Directory that relative paths printed by the detector are relative to.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    #[serde(default)]
    pub scope: ScopeMode,

    #[serde(default = "default_source_patterns")]
    pub source_patterns: Vec<String>,

    /// Extension name to its source directory or single source file.
    pub extensions: BTreeMap<String, PathBuf>,

    /// Capabilities declared per extension, replacing detection.
    #[serde(default)]
    pub capabilities: BTreeMap<String, Vec<String>>,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let path = absolute_path(path);
        let text = fs::read_to_string(&path).map_err(|source| AttribError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let root = path.parent().unwrap_or_else(|| Path::new("/"));
        let config: AnalysisConfig =
            toml::from_str(&text).map_err(|source| AttribError::ConfigParse {
                path: path.clone(),
                source,
            })?;
        config.resolved_against(root).validated()
    }

    /// Parse config text, resolving relative paths against `root`.
    pub fn from_toml(text: &str, root: &Path) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(text).map_err(|source| {
            AttribError::ConfigParse {
                path: root.to_path_buf(),
                source,
            }
        })?;
        config.resolved_against(root).validated()
    }

    fn resolved_against(mut self, root: &Path) -> Self {
        let resolve = |p: &Path| -> PathBuf {
            if p.is_relative() {
                root.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.host.source_dirs = self.host.source_dirs.iter().map(|p| resolve(p)).collect();
        self.reports_dir = resolve(&self.reports_dir);
        self.base_dir = self.base_dir.as_deref().map(resolve);
        for path in self.extensions.values_mut() {
            *path = resolve(path.as_path());
        }
        self
    }

    fn validated(self) -> Result<Self> {
        if self.host.source_dirs.is_empty() {
            return Err(AttribError::InvalidConfig(format!(
                "host `{}` has no source_dirs",
                self.host.name
            )));
        }
        if self.extensions.is_empty() {
            return Err(AttribError::InvalidConfig(
                "no extensions configured".to_string(),
            ));
        }
        if let Some(name) = self.extensions.keys().find(|n| n.trim().is_empty()) {
            return Err(AttribError::InvalidConfig(format!(
                "invalid extension name `{name}`"
            )));
        }
        for (name, declared) in &self.capabilities {
            if !self.extensions.contains_key(name) {
                return Err(AttribError::InvalidConfig(format!(
                    "capabilities declared for unknown extension `{name}`"
                )));
            }
            if let Err(unknown) = Capabilities::declared(self.host.kind, declared) {
                return Err(AttribError::InvalidConfig(format!(
                    "extension `{name}`: unknown capability `{unknown}` for host kind `{}`",
                    self.host.kind.as_str()
                )));
            }
        }
        self.source_filter()?;
        Ok(self)
    }

    pub fn source_filter(&self) -> Result<SourceFilter> {
        SourceFilter::from_patterns_or_default(&self.source_patterns)
    }

    /// Scope for one registered extension.
    pub fn scope_for(&self, extension: &str) -> Option<Scope> {
        let source = self.extensions.get(extension)?;
        let scope = Scope::new(source, &self.host.source_dirs).with_mode(self.scope);
        Some(match &self.base_dir {
            Some(base) => scope.with_base_dir(base),
            None => scope,
        })
    }

    /// Capabilities declared for one extension, if any. Detection is
    /// skipped for an extension that has them.
    pub fn declared_capabilities(&self, extension: &str) -> Result<Option<Capabilities>> {
        let Some(declared) = self.capabilities.get(extension) else {
            return Ok(None);
        };
        Capabilities::declared(self.host.kind, declared)
            .map(Some)
            .map_err(|unknown| {
                AttribError::InvalidConfig(format!("unknown capability `{unknown}`"))
            })
    }

    /// Detector reports for one extension: `<reports_dir>/<name>.txt`, or
    /// every `.txt` file in `<reports_dir>/<name>/` (one per host directory
    /// scanned), in name order. Empty when the detector produced nothing.
    pub fn report_paths(&self, extension: &str) -> Vec<PathBuf> {
        let single = self.reports_dir.join(format!("{extension}.txt"));
        if single.is_file() {
            return vec![single];
        }

        let Ok(entries) = fs::read_dir(self.reports_dir.join(extension)) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
