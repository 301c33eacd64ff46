//! Attribution of host-engine code copied into database engine extensions.
//!
//! The engine consumes the text report of a token-based duplicate-code
//! detector run over a host source tree and an extension source tree, and
//! counts the extension lines that duplicate host code:
//!
//! ```no_run
//! use hostcopy::attrib::{Scope, ScopeMode, attribute};
//!
//! let report = std::fs::read_to_string("cpd-fts5.txt")?;
//! let scope = Scope::new("/work/ext/fts5", ["/work/sqlite_src"]).with_mode(ScopeMode::Strict);
//! let attribution = attribute(&report, &scope)?;
//! println!("{} copied lines", attribution.copied_lines);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attrib;
pub mod batch;
pub mod capability;
pub mod config;
pub mod error;
pub mod loc;
pub mod logging;
pub mod report_helpers;
pub mod util;
pub mod walk;
