//! SQL formatter built on the grouped statement trees
//!
//! Formatting is a stack of [`StatementFilter`]s run over every statement
//! produced by [`parse`](crate::cst::parse). Filters rewrite the tree in
//! place; the statement's text is then serialized.
//!
//! Filters run in this order:
//! 1. strip comments
//! 2. strip whitespace (implied by reindent)
//! 3. reindent
//! 4. right margin, only without reindent
//! 5. keyword case
//! 6. identifier case
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlcst_core::{format, FormatOptions};
//!
//! let options = FormatOptions { reindent: true, ..Default::default() };
//! assert_eq!(format("select a from t", &options), "select a\nfrom t");
//! ```

mod filters;
mod output;
mod reindent;

pub use filters::{
    IdentifierCaseFilter, KeywordCaseFilter, RightMarginFilter, StripCommentsFilter,
    StripWhitespaceFilter,
};
pub use output::{serialize, split_unquoted_newlines};
pub use reindent::ReindentFilter;

use crate::config::FormatOptions;
use crate::cst::{SqlNode, parse};

/// In-place rewrite of one grouped statement
///
/// A filter sees the statements of one input in order and may keep state
/// between them.
pub trait StatementFilter {
    fn process(&mut self, statement: &SqlNode);
}

/// Ordered filters plus the serialization mode they call for
pub struct FilterStack {
    filters: Vec<Box<dyn StatementFilter>>,
    serialize: bool,
    reindent: bool,
}

impl FilterStack {
    pub fn new(options: &FormatOptions) -> Self {
        let mut filters: Vec<Box<dyn StatementFilter>> = Vec::new();
        if options.strip_comments {
            filters.push(Box::new(StripCommentsFilter));
        }
        if options.strips_whitespace() {
            filters.push(Box::new(StripWhitespaceFilter));
        }
        if options.reindent {
            filters.push(Box::new(ReindentFilter::new(options)));
        } else if let Some(width) = options.right_margin {
            filters.push(Box::new(RightMarginFilter::new(width)));
        }
        if let Some(case) = options.keyword_case {
            filters.push(Box::new(KeywordCaseFilter::new(case)));
        }
        if let Some(case) = options.identifier_case {
            filters.push(Box::new(IdentifierCaseFilter::new(case)));
        }

        Self {
            filters,
            serialize: options.strips_whitespace(),
            reindent: options.reindent,
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Parse `sql`, run every filter over each statement and join the results
    pub fn run(&mut self, sql: &str) -> String {
        let statements = parse(sql);
        tracing::debug!(
            statements = statements.len(),
            filters = self.filters.len(),
            "Formatting"
        );

        let mut out = String::with_capacity(sql.len());
        for statement in &statements {
            for filter in &mut self.filters {
                filter.process(statement);
            }
            let text = statement.text().to_string();
            if !self.serialize {
                out.push_str(&text);
                continue;
            }
            let text = serialize(&text);
            if text.is_empty() {
                continue;
            }
            // reindented statements carry their own separator
            if !self.reindent && !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&text);
        }
        out
    }
}

/// Format `sql` with `options`
pub fn format(sql: &str, options: &FormatOptions) -> String {
    FilterStack::new(options).run(sql)
}
