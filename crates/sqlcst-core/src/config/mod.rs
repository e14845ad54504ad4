//! Formatter configuration
//!
//! Options come from up to two layers: a config file and the command line.
//! Both deserialize into [`RawFormatOptions`]; [`RawFormatOptions::merge`]
//! layers them and [`RawFormatOptions::validate`] turns the result into a
//! typed [`FormatOptions`] or an `InvalidOption` error.
//!
//! ## Configuration Files
//!
//! - `.sqlcst.toml`
//! - `.sqlcst.json`
//!
//! When no explicit path is given, the loader searches from the current
//! directory upward until a config file is found or the filesystem root is
//! reached.
//!
//! ## Example Configuration
//!
//! ```toml
//! keywordCase = "upper"
//! reindent = true
//! indent_width = 4
//! comma_first = false
//! ```

mod loader;
mod options;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use options::{Case, FormatOptions, RawFormatOptions};
