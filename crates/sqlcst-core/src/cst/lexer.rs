//! Single-pass SQL scanner
//!
//! The scanner turns source text into a lazy stream of `(TokenType, &str)`
//! pairs that covers every byte of the input. It never fails: a character no
//! rule accepts becomes a one-character [`TokenType::Error`] token and
//! scanning continues after it.
//!
//! Keyword tables and compiled patterns live in an immutable [`Lexer`]. The
//! process-wide default instance is built once on first use and shared by
//! reference afterwards.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{LazyLock, OnceLock};

use regex::Regex;

use super::TokenType;
use super::keywords::{COMPARISON_OPERATORS, DEFAULT_TABLES, FUNCTION_KEYWORDS};
use crate::{Result, SqlcstError};

/// Characters that form operator runs
const OPERATOR_CHARS: &str = "+-/%^&|<>=~!@#";

/// Single-character punctuation, never merged into runs
const PUNCTUATION_CHARS: &str = "()[]{},;.:";

static MULTI_WORD_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:END\s+(?:IF|LOOP|FOR|WHILE|CASE)|(?:ORDER|GROUP|PARTITION)\s+BY|UNION\s+ALL|(?:(?:NATURAL|CROSS)\s+)?(?:(?:LEFT|RIGHT|FULL)\s+)?(?:(?:INNER|OUTER|STRAIGHT)\s+)?JOIN|NULLS\s+(?:FIRST|LAST)|NOT\s+NULL|IS\s+NOT|CREATE\s+OR\s+REPLACE|DOUBLE\s+PRECISION|(?:NOT\s+)?(?:LIKE|ILIKE|IN))\b",
    )
    .expect("multi-word keyword pattern is valid")
});

static DEFAULT_LEXER: OnceLock<Lexer> = OnceLock::new();

/// Uppercase a keyword and collapse internal whitespace runs to one space
pub fn normalize_keyword(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable scanner configuration: ordered keyword tables
#[derive(Debug, Clone)]
pub struct Lexer {
    tables: Vec<HashMap<String, TokenType>>,
}

impl Default for Lexer {
    fn default() -> Self {
        LexerBuilder::new().with_default_tables().build()
    }
}

impl Lexer {
    /// The shared lexer used by [`tokenize`], [`crate::parse`] and friends
    ///
    /// Built exactly once, even when first requested from several threads.
    pub fn default_instance() -> &'static Lexer {
        DEFAULT_LEXER.get_or_init(|| {
            let lexer = Lexer::default();
            tracing::debug!(tables = lexer.tables.len(), "Initialized default lexer");
            lexer
        })
    }

    pub fn builder() -> LexerBuilder {
        LexerBuilder::new()
    }

    /// Look up an upper-case word across the keyword tables
    ///
    /// Returns [`TokenType::Name`] when no table contains it.
    pub fn keyword_type(&self, upper: &str) -> TokenType {
        self.tables
            .iter()
            .find_map(|table| table.get(upper).copied())
            .unwrap_or(TokenType::Name)
    }

    /// Scan `text` lazily
    pub fn tokenize<'a>(&'a self, text: &'a str) -> Tokens<'a> {
        Tokens {
            lexer: self,
            text,
            pos: 0,
            after_dot: false,
        }
    }

    /// Classify the token at the start of `rest`, returning its type and byte length
    fn scan_one(&self, rest: &str, after_dot: bool) -> (TokenType, usize) {
        let mut chars = rest.chars();
        let Some(first) = chars.next() else {
            return (TokenType::Error, 0);
        };
        let second = chars.next();

        if first.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            let ttype = if rest[..len].contains(['\n', '\r']) {
                TokenType::Newline
            } else {
                TokenType::Whitespace
            };
            return (ttype, len);
        }

        if rest.starts_with("--") {
            return (TokenType::CommentSingle, line_end(rest));
        }
        if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            return (TokenType::CommentMultiline, len);
        }

        match first {
            '\'' => return (TokenType::StringSingle, scan_quoted(rest, '\'')),
            '"' => return (TokenType::StringSymbol, scan_quoted(rest, '"')),
            '`' => return (TokenType::Name, scan_quoted(rest, '`')),
            '$' => {
                if let Some(len) = scan_dollar_quoted(rest) {
                    return (TokenType::Literal, len);
                }
                if second.is_some_and(|c| c.is_ascii_digit()) {
                    let len = 1 + count_bytes(&rest[1..], |c| c.is_ascii_digit());
                    return (TokenType::NamePlaceholder, len);
                }
            }
            _ => {}
        }

        if first.is_ascii_digit() {
            let len = count_bytes(rest, |c| c.is_ascii_digit() || c == '.');
            let ttype = if rest[..len].contains('.') {
                TokenType::NumberFloat
            } else {
                TokenType::NumberInteger
            };
            return (ttype, len);
        }

        if first.is_alphabetic() || first == '_' || first == '$' {
            return self.scan_word(rest, after_dot);
        }

        match (first, second) {
            (':', Some('=')) => return (TokenType::Assignment, 2),
            (':', Some(':')) => return (TokenType::Punctuation, 2),
            (':', Some(c)) if c.is_alphabetic() || c == '_' => {
                let len = 1 + count_bytes(&rest[1..], |c| c.is_alphanumeric() || c == '_');
                return (TokenType::NamePlaceholder, len);
            }
            ('?', _) => return (TokenType::NamePlaceholder, 1),
            ('%', Some('s')) if !rest[2..].starts_with(|c: char| c.is_alphanumeric()) => {
                return (TokenType::NamePlaceholder, 2);
            }
            ('%', Some('(')) => {
                if let Some(close) = rest.find(")s") {
                    if !rest[..close].contains(char::is_whitespace) {
                        return (TokenType::NamePlaceholder, close + 2);
                    }
                }
            }
            ('*', _) => return (TokenType::Wildcard, 1),
            _ => {}
        }

        if OPERATOR_CHARS.contains(first) {
            let len = operator_run(rest);
            let ttype = if COMPARISON_OPERATORS.contains(&&rest[..len]) {
                TokenType::OperatorComparison
            } else {
                TokenType::Operator
            };
            return (ttype, len);
        }

        if PUNCTUATION_CHARS.contains(first) {
            return (TokenType::Punctuation, first.len_utf8());
        }

        (TokenType::Error, first.len_utf8())
    }

    fn scan_word(&self, rest: &str, after_dot: bool) -> (TokenType, usize) {
        let starts_alphabetic = rest.starts_with(char::is_alphabetic);
        if starts_alphabetic && !after_dot {
            if let Some(found) = MULTI_WORD_KEYWORD.find(rest) {
                let text = found.as_str();
                // single words that are not one of the multi-word forms fall through
                if text.contains(char::is_whitespace) || is_standalone_form(text) {
                    return (multi_word_type(text), found.end());
                }
            }
        }

        let len = count_bytes(rest, |c| c.is_alphanumeric() || c == '_' || c == '$');
        let word = &rest[..len];
        let next = rest[len..].chars().next();

        if after_dot || next == Some('.') {
            return (TokenType::Name, len);
        }

        let upper = word.to_uppercase();
        if upper == "ASC" || upper == "DESC" {
            return (TokenType::KeywordOrder, len);
        }

        let ttype = self.keyword_type(&upper);
        if next == Some('(')
            && (ttype == TokenType::KeywordDml
                || ttype == TokenType::NameBuiltin
                || FUNCTION_KEYWORDS.contains(&upper.as_str()))
        {
            return (TokenType::Name, len);
        }
        (ttype, len)
    }
}

/// Single words the multi-word pattern may match on their own
fn is_standalone_form(text: &str) -> bool {
    matches!(
        text.to_uppercase().as_str(),
        "JOIN" | "LIKE" | "ILIKE" | "IN"
    )
}

fn multi_word_type(text: &str) -> TokenType {
    let normalized = normalize_keyword(text);
    if normalized.ends_with("LIKE") || normalized == "IN" || normalized.ends_with(" IN") {
        TokenType::OperatorComparison
    } else if normalized == "CREATE OR REPLACE" {
        TokenType::KeywordDdl
    } else if normalized == "DOUBLE PRECISION" {
        TokenType::NameBuiltin
    } else {
        TokenType::Keyword
    }
}

/// Byte length of the leading run of characters matching `pred`
fn count_bytes(text: &str, pred: impl Fn(char) -> bool) -> usize {
    text.find(|c: char| !pred(c)).unwrap_or(text.len())
}

/// Length of a line comment including its line break
fn line_end(rest: &str) -> usize {
    match rest.find(['\n', '\r']) {
        Some(i) if rest[i..].starts_with("\r\n") => i + 2,
        Some(i) => i + 1,
        None => rest.len(),
    }
}

/// Length of a quoted token starting with `quote`
///
/// A backslash escapes the next character and a doubled quote stands for
/// one literal quote. Without a closing quote the token runs to the end.
fn scan_quoted(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    let mut chars = rest.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == quote {
            if chars.peek().is_some_and(|&(_, next)| next == quote) {
                chars.next();
                continue;
            }
            return i + c.len_utf8();
        }
    }
    rest.len()
}

/// Length of a `$tag$ ... $tag$` literal, if `rest` opens one
fn scan_dollar_quoted(rest: &str) -> Option<usize> {
    let tag_len = count_bytes(&rest[1..], |c| c.is_alphanumeric() || c == '_');
    let tag = &rest[1..1 + tag_len];
    if tag.starts_with(|c: char| c.is_ascii_digit()) || !rest[1 + tag_len..].starts_with('$') {
        return None;
    }
    let delimiter = &rest[..tag_len + 2];
    let body = &rest[delimiter.len()..];
    Some(
        body.find(delimiter)
            .map_or(rest.len(), |i| delimiter.len() + i + delimiter.len()),
    )
}

/// Length of a maximal operator run that does not swallow a comment start
fn operator_run(rest: &str) -> usize {
    let mut len = 0;
    for (i, c) in rest.char_indices() {
        if !OPERATOR_CHARS.contains(c) {
            break;
        }
        let tail = &rest[i..];
        if i > 0 && (tail.starts_with("--") || tail.starts_with("/*")) {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}

/// Lazy token stream produced by [`Lexer::tokenize`]
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    lexer: &'a Lexer,
    text: &'a str,
    pos: usize,
    after_dot: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (TokenType, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..).filter(|rest| !rest.is_empty())?;
        let (ttype, len) = self.lexer.scan_one(rest, self.after_dot);
        if len == 0 {
            return None;
        }
        let value = &rest[..len];
        self.pos += len;
        self.after_dot = ttype == TokenType::Punctuation && value == ".";
        Some((ttype, value))
    }
}

/// Builder for lexers with custom keyword tables
#[derive(Debug, Clone, Default)]
pub struct LexerBuilder {
    tables: Vec<HashMap<String, TokenType>>,
}

impl LexerBuilder {
    /// Start with no keyword tables; every word scans as a name
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the built-in tables in their default priority order
    pub fn with_default_tables(mut self) -> Self {
        for table in DEFAULT_TABLES {
            self = self.add_keywords(table.iter().copied());
        }
        self
    }

    /// Drop every table added so far
    pub fn clear(mut self) -> Self {
        self.tables.clear();
        self
    }

    /// Append a table; earlier tables win on conflicts
    pub fn add_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = (S, TokenType)>,
        S: AsRef<str>,
    {
        let table = keywords
            .into_iter()
            .map(|(word, ttype)| (word.as_ref().to_uppercase(), ttype))
            .collect();
        self.tables.push(table);
        self
    }

    pub fn build(self) -> Lexer {
        Lexer {
            tables: self.tables,
        }
    }
}

/// Tokenize `sql` with the default lexer
pub fn tokenize(sql: &str) -> Tokens<'_> {
    Lexer::default_instance().tokenize(sql)
}

/// Decode raw input bytes into text
///
/// `None` means UTF-8. A leading UTF-8 byte order mark is dropped.
pub fn decode<'a>(bytes: &'a [u8], encoding: Option<&str>) -> Result<Cow<'a, str>> {
    let label = encoding.unwrap_or("utf-8").to_ascii_lowercase();
    match label.as_str() {
        "utf-8" | "utf8" => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|err| SqlcstError::decode_error("utf-8", err.to_string()))
        }
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => {
            Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
        }
        "ascii" | "us-ascii" => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(position) => Err(SqlcstError::decode_error(
                "ascii",
                format!("non-ASCII byte at offset {position}"),
            )),
            None => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|err| SqlcstError::decode_error("ascii", err.to_string())),
        },
        _ => Err(SqlcstError::UnsupportedEncoding { encoding: label }),
    }
}

/// Decode `bytes` and tokenize them, collecting owned tokens
pub fn tokenize_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<Vec<(TokenType, String)>> {
    let text = decode(bytes, encoding)?;
    Ok(tokenize(&text)
        .map(|(ttype, value)| (ttype, value.to_string()))
        .collect())
}
