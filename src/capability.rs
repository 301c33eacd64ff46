//! Extension capability detection.
//!
//! Each host engine exposes a fixed set of extension points (SQL functions,
//! virtual tables, storage engines, ...). An extension's use of them is found
//! by scanning its source for the registration calls of that host.

use std::collections::BTreeSet;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Host engine family, selecting the registration keywords to look for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// No capability detection.
    #[default]
    Generic,
    Sqlite,
    Duckdb,
    Mariadb,
}

const SQLITE_CAPABILITIES: &[&str] = &["function", "storage_manager"];

const DUCKDB_CAPABILITIES: &[&str] = &[
    "filesystem",
    "function",
    "operator",
    "optimizer",
    "parser",
    "storage",
    "table_function",
    "type",
];

const MARIADB_CAPABILITIES: &[&str] = &[
    "audit",
    "authentication",
    "daemon",
    "encryption",
    "ftparser",
    "function",
    "info_schema",
    "pass_validation",
    "replication",
    "storage_engine",
    "type",
];

/// SQLite amalgamation files vendored by extensions; their registration
/// calls belong to the host.
const SQLITE_HOST_FILES: &[&str] = &["sqlite3.h", "sqlite3ext.h", "sqlite3.c", "shell.c"];

/// `(keyword, capability)` matched anywhere in a trimmed C line.
const SQLITE_C_KEYWORDS: &[(&str, &str)] = &[
    ("sqlite3_create_function", "function"),
    ("sqlite3_create_window_function", "function"),
    ("sqlite3_create_collation", "function"),
    ("sqlite3_declare_vtab", "storage_manager"),
    ("sqlite3_vfs_register", "storage_manager"),
];

/// Same for Rust extensions built on the SQLite bindings.
const SQLITE_RS_KEYWORDS: &[(&str, &str)] = &[
    ("define_scalar_function", "function"),
    ("create_scalar_function", "function"),
    ("define_table_function", "storage_manager"),
    ("define_virtual_table", "storage_manager"),
];

/// Statements starting with the prefix, checked in order.
const DUCKDB_PREFIXES: &[(&str, &str)] = &[
    ("ExtensionUtil::RegisterFunction", "function"),
    ("OperatorExtension", "operator"),
    ("OptimizerExtension", "optimizer"),
    ("ParserExtension", "parser"),
    ("StorageExtension", "storage"),
    ("ExtensionUtil::RegisterType", "type"),
];

/// Statements containing the keyword, checked after the prefixes.
const DUCKDB_KEYWORDS: &[(&str, &str)] = &[
    ("CreateFunction", "function"),
    ("CreateTableFunction", "table_function"),
    ("RegisterSubSystem", "filesystem"),
    ("parser_extensions.push_back", "parser"),
    (".storage_extensions", "storage"),
    ("operator_extensions.push_back", "operator"),
    ("optimizer_extensions.push_back", "optimizer"),
];

/// Plugin type constants, the first field of a plugin declaration.
const MARIADB_PLUGIN_TYPES: &[(&str, &str)] = &[
    ("MYSQL_AUDIT_PLUGIN,", "audit"),
    ("MYSQL_AUTHENTICATION_PLUGIN,", "authentication"),
    ("MYSQL_DAEMON_PLUGIN,", "daemon"),
    ("MariaDB_ENCRYPTION_PLUGIN,", "encryption"),
    ("MYSQL_FTPARSER_PLUGIN,", "ftparser"),
    ("MariaDB_FUNCTION_PLUGIN,", "function"),
    ("MYSQL_INFORMATION_SCHEMA_PLUGIN,", "info_schema"),
    ("MariaDB_PASSWORD_VALIDATION_PLUGIN,", "pass_validation"),
    ("MYSQL_REPLICATION_PLUGIN,", "replication"),
    ("MYSQL_STORAGE_ENGINE_PLUGIN,", "storage_engine"),
    ("MariaDB_DATA_TYPE_PLUGIN,", "type"),
];

const MARIADB_DECLARATIONS: &[&str] = &["maria_declare_plugin(", "mysql_declare_plugin("];

const MARIADB_CLIENT_AUTH: &str = "mysql_declare_client_plugin(AUTHENTICATION)";

impl HostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HostKind::Generic => "generic",
            HostKind::Sqlite => "sqlite",
            HostKind::Duckdb => "duckdb",
            HostKind::Mariadb => "mariadb",
        }
    }

    /// Capability names of this host, in report column order.
    pub fn capabilities(self) -> &'static [&'static str] {
        match self {
            HostKind::Generic => &[],
            HostKind::Sqlite => SQLITE_CAPABILITIES,
            HostKind::Duckdb => DUCKDB_CAPABILITIES,
            HostKind::Mariadb => MARIADB_CAPABILITIES,
        }
    }

    /// Canonical spelling of a capability name, if the host has it.
    pub fn capability(self, name: &str) -> Option<&'static str> {
        self.capabilities().iter().copied().find(|c| *c == name)
    }
}

fn is_rust_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "rs")
}

fn duckdb_line(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("//") || trimmed.starts_with('*') || !trimmed.ends_with(';') {
        return None;
    }
    DUCKDB_PREFIXES
        .iter()
        .find(|(prefix, _)| trimmed.starts_with(prefix))
        .or_else(|| DUCKDB_KEYWORDS.iter().find(|(kw, _)| trimmed.contains(kw)))
        .map(|(_, cap)| *cap)
}

fn mariadb_plugin_type(trimmed: &str) -> Option<&'static str> {
    MARIADB_PLUGIN_TYPES
        .iter()
        .find(|(prefix, _)| trimmed.starts_with(prefix))
        .map(|(_, cap)| *cap)
}

/// Accumulates the capabilities found in the files of one extension.
#[derive(Debug)]
pub struct CapabilityScanner {
    kind: HostKind,
    found: BTreeSet<&'static str>,
}

impl CapabilityScanner {
    pub fn new(kind: HostKind) -> Self {
        Self {
            kind,
            found: BTreeSet::new(),
        }
    }

    /// Whether `path` should be scanned. `is_source` tells whether the file
    /// matched the source patterns used for line counting.
    pub fn accepts(&self, path: &Path, is_source: bool) -> bool {
        match self.kind {
            HostKind::Generic => false,
            HostKind::Sqlite => {
                if is_rust_file(path) {
                    return true;
                }
                let vendored = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SQLITE_HOST_FILES.contains(&n));
                is_source && !vendored
            }
            HostKind::Duckdb | HostKind::Mariadb => is_source,
        }
    }

    /// Scan the lines of one accepted file.
    pub fn scan<S: AsRef<str>>(&mut self, path: &Path, lines: &[S]) {
        match self.kind {
            HostKind::Generic => {}
            HostKind::Sqlite => {
                let table = if is_rust_file(path) {
                    SQLITE_RS_KEYWORDS
                } else {
                    SQLITE_C_KEYWORDS
                };
                for line in lines {
                    let trimmed = line.as_ref().trim();
                    for &(keyword, cap) in table {
                        if trimmed.contains(keyword) {
                            self.found.insert(cap);
                        }
                    }
                }
            }
            HostKind::Duckdb => {
                for line in lines {
                    if let Some(cap) = duckdb_line(line.as_ref().trim()) {
                        self.found.insert(cap);
                    }
                }
            }
            HostKind::Mariadb => self.scan_mariadb(lines),
        }
    }

    /// A plugin declaration is `maria_declare_plugin(name)` on its own line,
    /// then `{`, then the plugin type constant.
    fn scan_mariadb<S: AsRef<str>>(&mut self, lines: &[S]) {
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.as_ref().trim();
            let declares = MARIADB_DECLARATIONS
                .iter()
                .any(|d| trimmed.starts_with(d))
                && trimmed.ends_with(')');

            if declares {
                let opens = lines.get(i + 1).is_some_and(|l| l.as_ref().trim() == "{");
                if opens
                    && let Some(cap) = lines
                        .get(i + 2)
                        .and_then(|l| mariadb_plugin_type(l.as_ref().trim()))
                {
                    self.found.insert(cap);
                }
            } else if trimmed.starts_with(MARIADB_CLIENT_AUTH) {
                self.found.insert("authentication");
            }
        }
    }

    pub fn finish(self) -> Capabilities {
        Capabilities::new(self.kind, self.found)
    }
}

/// Yes/no flag per capability of the host, in the host's column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    entries: Vec<(&'static str, bool)>,
}

impl Capabilities {
    fn new(kind: HostKind, found: BTreeSet<&'static str>) -> Self {
        Self {
            entries: kind
                .capabilities()
                .iter()
                .map(|cap| (*cap, found.contains(cap)))
                .collect(),
        }
    }

    /// Capabilities declared up front, replacing detection. Unknown names
    /// are returned as the error.
    pub fn declared<S: AsRef<str>>(kind: HostKind, names: &[S]) -> Result<Self, String> {
        let mut found = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            let cap = kind.capability(name).ok_or_else(|| name.to_string())?;
            found.insert(cap);
        }
        Ok(Self::new(kind, found))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(cap, _)| *cap == name)
            .map(|(_, present)| *present)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.entries.iter().copied()
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (cap, present) in &self.entries {
            map.serialize_entry(cap, present)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "capability_test.rs"]
mod tests;
