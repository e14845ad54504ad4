//! Statement splitting over the token stream
//!
//! [`StatementSplitter`] consumes `(TokenType, &str)` pairs and yields one
//! flat token list per statement. A nesting level tracks blocks and brackets
//! so that a `;` inside `BEGIN ... END` or a parenthesis does not end the
//! statement.
//!
//! After a terminator, whitespace and line comments up to the end of that
//! line stay with the statement they follow, as does whitespace that runs to
//! the end of the input. The emitted lists together cover every token of the
//! input.

use super::TokenType;
use super::lexer::{Tokens, normalize_keyword, tokenize};

/// One statement as scanned tokens
pub type FlatStatement<'a> = Vec<(TokenType, &'a str)>;

/// Opener whose effect depends on the next significant token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOpener {
    Begin,
    If,
    For,
    While,
}

impl PendingOpener {
    /// Whether `next` turns the opener into an ordinary keyword
    fn cancelled_by(self, ttype: TokenType, next: &str) -> bool {
        match self {
            Self::Begin => {
                (ttype == TokenType::Punctuation && next == ";")
                    || (ttype.is_a(TokenType::Keyword)
                        && matches!(next, "TRANSACTION" | "WORK" | "TRAN"))
            }
            Self::If => ttype.is_a(TokenType::Keyword) && matches!(next, "EXISTS" | "NOT"),
            Self::For => ttype.is_a(TokenType::Keyword) && matches!(next, "UPDATE" | "SHARE"),
            Self::While => false,
        }
    }
}

/// Lazily partitions a token stream into statements
#[derive(Debug)]
pub struct StatementSplitter<'a, I> {
    tokens: I,
    current: FlatStatement<'a>,
    level: usize,
    pending: Option<PendingOpener>,
    consume_ws: bool,
    done: bool,
}

impl<'a, I> StatementSplitter<'a, I>
where
    I: Iterator<Item = (TokenType, &'a str)>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            current: Vec::new(),
            level: 0,
            pending: None,
            consume_ws: false,
            done: false,
        }
    }

    /// Current block nesting depth
    pub fn level(&self) -> usize {
        self.level
    }

    /// Adjust the level for one significant token
    fn track_level(&mut self, ttype: TokenType, value: &str) {
        let word = if ttype.is_a(TokenType::Keyword) {
            normalize_keyword(value)
        } else {
            value.to_string()
        };

        if let Some(opener) = self.pending.take() {
            if !opener.cancelled_by(ttype, &word) {
                self.level += 1;
            }
        }

        if ttype == TokenType::Punctuation {
            match value {
                "(" => self.level += 1,
                ")" => self.level = self.level.saturating_sub(1),
                _ => {}
            }
            return;
        }

        if !ttype.is_a(TokenType::Keyword) {
            return;
        }

        match word.as_str() {
            "CASE" => self.level += 1,
            "BEGIN" => self.pending = Some(PendingOpener::Begin),
            "IF" if self.level > 0 => self.pending = Some(PendingOpener::If),
            "FOR" | "FOREACH" if self.level > 0 => self.pending = Some(PendingOpener::For),
            "WHILE" if self.level > 0 => self.pending = Some(PendingOpener::While),
            "END" | "END IF" | "END LOOP" | "END FOR" | "END WHILE" | "END CASE" => {
                self.level = self.level.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn is_terminator(&self, ttype: TokenType, value: &str) -> bool {
        self.level == 0
            && ((ttype == TokenType::Punctuation && value == ";")
                || (ttype.is_a(TokenType::Keyword) && value.eq_ignore_ascii_case("GO")))
    }

    fn emit(&mut self) -> FlatStatement<'a> {
        self.level = 0;
        self.pending = None;
        self.consume_ws = false;
        let statement = std::mem::take(&mut self.current);
        tracing::trace!(tokens = statement.len(), "Split statement");
        statement
    }
}

impl<'a, I> Iterator for StatementSplitter<'a, I>
where
    I: Iterator<Item = (TokenType, &'a str)>,
{
    type Item = FlatStatement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some((ttype, value)) = self.tokens.next() {
            if self.consume_ws {
                if ttype == TokenType::Whitespace
                    || ttype == TokenType::Newline
                    || ttype == TokenType::CommentSingle
                {
                    self.current.push((ttype, value));
                    if value.contains(['\n', '\r']) {
                        return Some(self.finish_line());
                    }
                    continue;
                }
                let statement = self.emit();
                self.current.push((ttype, value));
                self.after_push(ttype, value);
                return Some(statement);
            }

            self.current.push((ttype, value));
            self.after_push(ttype, value);
        }

        self.done = true;
        if !self.current.is_empty() {
            return Some(self.emit());
        }
        None
    }
}

impl<'a, I> StatementSplitter<'a, I>
where
    I: Iterator<Item = (TokenType, &'a str)>,
{
    /// Emit the statement whose last line just ended
    ///
    /// Whitespace after that line belongs to the next statement, or to this
    /// one when nothing else follows.
    fn finish_line(&mut self) -> FlatStatement<'a> {
        let mut tail = Vec::new();
        while let Some((ttype, value)) = self.tokens.next() {
            if ttype.is_a(TokenType::Whitespace) {
                tail.push((ttype, value));
                continue;
            }
            let statement = self.emit();
            self.current = tail;
            self.current.push((ttype, value));
            self.after_push(ttype, value);
            return statement;
        }
        self.done = true;
        self.current.extend(tail);
        self.emit()
    }

    fn after_push(&mut self, ttype: TokenType, value: &str) {
        if ttype.is_a(TokenType::Whitespace) || ttype.is_a(TokenType::Comment) {
            return;
        }
        self.track_level(ttype, value);
        if self.is_terminator(ttype, value) {
            self.consume_ws = true;
        }
    }
}

/// Split `sql` into flat per-statement token lists
pub fn split_statements(sql: &str) -> StatementSplitter<'_, Tokens<'_>> {
    StatementSplitter::new(tokenize(sql))
}

/// Split `sql` into statement texts, trimmed, dropping empty ones
pub fn split(sql: &str) -> Vec<String> {
    split_statements(sql)
        .map(|statement| statement.iter().map(|(_, value)| *value).collect::<String>())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sql: &str) -> Vec<String> {
        split_statements(sql)
            .map(|statement| statement.iter().map(|(_, value)| *value).collect())
            .collect()
    }

    #[test]
    fn test_two_statements() {
        assert_eq!(texts("SELECT 1; SELECT 2;"), vec!["SELECT 1; ", "SELECT 2;"]);
        assert_eq!(split("SELECT 1; SELECT 2;"), vec!["SELECT 1;", "SELECT 2;"]);
    }

    #[test]
    fn test_missing_terminator() {
        assert_eq!(texts("SELECT 1"), vec!["SELECT 1"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(texts("").is_empty());
        assert_eq!(texts("  \n "), vec!["  \n "]);
        assert!(split("  \n ").is_empty());
    }

    #[test]
    fn test_begin_block_is_one_statement() {
        assert_eq!(texts("BEGIN SELECT 1; END;"), vec!["BEGIN SELECT 1; END;"]);
    }

    #[test]
    fn test_transaction_begin_does_not_nest() {
        assert_eq!(
            texts("BEGIN; SELECT 1; COMMIT;"),
            vec!["BEGIN; ", "SELECT 1; ", "COMMIT;"]
        );
        assert_eq!(
            texts("BEGIN TRANSACTION; SELECT 1;"),
            vec!["BEGIN TRANSACTION; ", "SELECT 1;"]
        );
    }

    #[test]
    fn test_parenthesis_and_case_nest() {
        assert_eq!(
            texts("SELECT (1;2); SELECT 3"),
            vec!["SELECT (1;2); ", "SELECT 3"]
        );
        assert_eq!(
            texts("SELECT CASE WHEN a THEN 1; END; x"),
            vec!["SELECT CASE WHEN a THEN 1; END; ", "x"]
        );
    }

    #[test]
    fn test_plpgsql_body() {
        let sql = "CREATE FUNCTION f() BEGIN IF x THEN y; END IF; FOR r IN 1..2 LOOP z; END LOOP; END; SELECT 1;";
        let statements = texts(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[1].starts_with("SELECT"));
    }

    #[test]
    fn test_if_exists_outside_block() {
        assert_eq!(
            texts("DROP TABLE IF EXISTS a; DROP TABLE b;"),
            vec!["DROP TABLE IF EXISTS a; ", "DROP TABLE b;"]
        );
    }

    #[test]
    fn test_unbalanced_closers_do_not_underflow() {
        assert_eq!(texts("a ) ) ; b"), vec!["a ) ) ; ", "b"]);
        assert_eq!(texts("END; x"), vec!["END; ", "x"]);
    }

    #[test]
    fn test_trailing_comment_stays_with_statement() {
        assert_eq!(
            texts("SELECT 1; -- one\nSELECT 2;\n"),
            vec!["SELECT 1; -- one\n", "SELECT 2;\n"]
        );
    }

    #[test]
    fn test_own_line_comment_goes_to_next_statement() {
        assert_eq!(
            texts("SELECT 1;\n-- two\nSELECT 2"),
            vec!["SELECT 1;\n", "-- two\nSELECT 2"]
        );
    }

    #[test]
    fn test_go_separator() {
        assert_eq!(texts("SELECT 1\nGO\nSELECT 2"), vec!["SELECT 1\nGO\n", "SELECT 2"]);
    }

    #[test]
    fn test_trailing_block_comment_is_kept() {
        assert_eq!(texts("SELECT 1; /* end */"), vec!["SELECT 1; ", "/* end */"]);
    }

    #[test]
    fn test_whitespace_after_last_line_joins_last_statement() {
        assert_eq!(texts("SELECT 1; -- one\n  "), vec!["SELECT 1; -- one\n  "]);
        assert_eq!(texts("SELECT 1; -- c\n\n"), vec!["SELECT 1; -- c\n\n"]);
        assert_eq!(texts("SELECT 1;\n \n"), vec!["SELECT 1;\n \n"]);
        assert_eq!(split("SELECT 1; -- one\n  "), vec!["SELECT 1; -- one"]);
    }

    #[test]
    fn test_blank_lines_lead_the_next_statement() {
        assert_eq!(
            texts("SELECT 1; -- c\n\n  SELECT 2"),
            vec!["SELECT 1; -- c\n", "\n  SELECT 2"]
        );
    }

    #[test]
    fn test_round_trip() {
        let sql = "select a from b;\n\n  insert into t values (1, ';');   \n-- tail";
        assert_eq!(texts(sql).concat(), sql);
    }
}
