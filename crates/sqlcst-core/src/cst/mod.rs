//! Concrete Syntax Tree (CST) for SQL
//!
//! This module turns SQL text into lossless syntax trees built on rowan.
//! Every byte of the input, whitespace and comments included, ends up in
//! exactly one leaf, so `parse(sql)` concatenated reproduces `sql`.
//!
//! ## Pipeline
//!
//! - **Lexer**: character-class scanner producing `(TokenType, &str)` pairs
//! - **Splitter**: partitions the token stream into statements, tracking
//!   block nesting so `;` inside `BEGIN ... END` does not split
//! - **Builder**: one mutable rowan tree per statement
//! - **Grouping**: nests the flat statement into parentheses, identifiers,
//!   functions, comparisons, clauses and lists
//!
//! ## Tree model
//!
//! Leaves carry a [`TokenType`] from a small is-a taxonomy; composite nodes
//! carry a [`NodeKind`]. Trees are rowan *mutable* trees so that grouping and
//! formatter filters can restructure them in place. [`TokenList`] provides
//! the navigation and mutation API and [`ast`] the typed wrappers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlcst_core::cst::{parse, TokenList};
//!
//! let statements = parse("select a from t; select 2");
//! assert_eq!(statements.len(), 2);
//! print!("{}", statements[0].pprint_tree());
//! ```

mod builder;
mod grouping;
mod keywords;
mod language;
mod lexer;
mod matching;
mod splitter;
mod syntax_kind;
mod tree;

pub mod ast;

pub use builder::{build_statement, parse, parse_with, round_trip};
pub use grouping::{group, recurse_bottom_up};
pub use keywords::{
    DEFAULT_TABLES, KEYWORDS, KEYWORDS_COMMON, KEYWORDS_PLPGSQL, KEYWORDS_TYPES,
};
pub use language::{SqlElement, SqlLanguage, SqlNode, SqlToken};
pub use lexer::{
    Lexer, LexerBuilder, Tokens, decode, normalize_keyword, tokenize, tokenize_bytes,
};
pub use matching::{KindMatcher, Pattern, matcher};
pub use splitter::{FlatStatement, StatementSplitter, split, split_statements};
pub use syntax_kind::{NodeKind, SqlSyntaxKind, TokenType};
pub use tree::{
    ElementExt, TokenList, detach_element, new_node, new_token, replace_token, replace_token_text,
};
