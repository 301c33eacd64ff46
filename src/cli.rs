//! CLI argument definitions for the `hc` command.
//!
//! Defines all subcommands, their arguments, and long help text
//! using the `clap` derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use hostcopy::attrib::ScopeMode;

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(
    name = "hc",
    version,
    about = "Attribute host-engine code copied into database extensions"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Count lines an extension copied from its host, from detector reports
    #[command(long_about = "\
Count the source lines of one extension that duplicate host-engine code.

Reads the text report of a token-based duplicate-code detector (PMD CPD
text format) that was run over the host source and the extension source.
Every duplication block is parsed, the occurrences inside the extension are
resolved to line ranges clipped to the files on disk, overlapping and
adjacent ranges are merged per file, and the covered lines are summed.

Several reports can be given (e.g. one detector run per host directory);
they are accounted together. Use `-` to read a report from stdin.

Relative --extension, --host and --base-dir paths are taken from the
current directory, so they match reports that print absolute paths.

Scope modes:
  extension-only  any block with an extension occurrence counts
  host-sibling    the block must also touch a host directory (default)
  strict          every occurrence must be in the extension or the host

Examples:
  hc attribute cpd.txt --extension ext/fts5 --host sqlite_src
  hc attribute cpd-*.txt --extension plugin/auth --host include --host mysys
  hc attribute cpd.txt --extension ext/fts5 --host sqlite_src --intervals
  pmd cpd ... | hc attribute - --extension ext/fts5 --host sqlite_src --json")]
    Attribute {
        /// Detector report files (`-` for stdin)
        #[arg(required = true)]
        reports: Vec<PathBuf>,

        /// Extension source directory, or its single source file
        #[arg(short, long)]
        extension: PathBuf,

        /// Host engine source directory (repeat for several)
        #[arg(long = "host", required = true)]
        hosts: Vec<PathBuf>,

        /// Which blocks count as copied from the host
        #[arg(long, value_enum, default_value_t = ScopeMode::HostSibling)]
        scope: ScopeMode,

        /// Directory that relative paths in the report are relative to
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Source file glob for the total line count (default: C/C++ sources)
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Show merged line ranges per file
        #[arg(short, long)]
        intervals: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write the attributed blocks to this file
        #[arg(long)]
        blocks_out: Option<PathBuf>,
    },

    /// Attribute every extension of a registry config
    #[command(long_about = "\
Attribute every extension listed in a TOML config against its host.

For each extension, in name order, the report `<reports_dir>/<name>.txt`
is read (or every `.txt` file in `<reports_dir>/<name>/`). Extensions
without a report are listed as `missing`; an extension whose sources
cannot be read, or whose blocks file cannot be written, is listed as
`error`. Neither stops the run.

With `host.kind` set (sqlite, duckdb, mariadb), each row also shows which
host extension points the extension registers, detected from its source
or taken from the `[capabilities]` table.

Example config:
  reports_dir = \"cpd\"
  scope = \"host-sibling\"

  [host]
  name = \"duckdb\"
  kind = \"duckdb\"
  source_dirs = [\"duckdb/src\"]

  [extensions]
  spatial = \"work/duckdb_spatial/spatial\"
  json = \"duckdb/extension/json\"

  [capabilities]
  json = [\"function\", \"table_function\"]

Relative paths are resolved against the config file's directory.")]
    Batch {
        /// Path to the TOML config
        #[arg(short, long)]
        config: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write each extension's attributed blocks into this directory
        #[arg(long)]
        blocks_out: Option<PathBuf>,
    },

    /// Count the source lines of an extension tree
    Loc {
        /// Extension directory or source file (default: current directory)
        path: Option<PathBuf>,

        /// Source file glob (default: C/C++ sources)
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
