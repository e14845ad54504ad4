//! sqlcst Core
//!
//! Non-validating SQL processing: a lexer that classifies every character of
//! its input, a block-aware statement splitter, a grouping engine that nests
//! the flat token stream into a lossless syntax tree, and a formatter built
//! from filters over those trees.
//!
//! Malformed SQL is never rejected. Every byte of the input ends up in exactly
//! one leaf, so the statements returned by [`parse`] concatenate back to the
//! original text.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod error;
pub mod formatter;
pub mod result;

// Re-export commonly used types
pub use config::{Case, ConfigLoader, FormatOptions, RawFormatOptions};
pub use cst::{
    ElementExt, NodeKind, SqlElement, SqlNode, SqlToken, TokenList, TokenType, parse, split,
    split_statements, tokenize, tokenize_bytes,
};
pub use error::{ErrorKind, SqlcstError};
pub use formatter::{FilterStack, StatementFilter, format};
pub use result::Result;

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` takes precedence over `default_directive`.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
