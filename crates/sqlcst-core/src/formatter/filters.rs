//! Comment, whitespace, margin and case filters

use regex::Regex;
use std::sync::LazyLock;

use super::StatementFilter;
use crate::config::Case;
use crate::cst::{
    ElementExt, NodeKind, SqlElement, SqlNode, TokenList, TokenType, detach_element, new_token,
    replace_token, replace_token_text,
};

/// Trailing line breaks of a comment, followed only by spaces
static TRAILING_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\r\n]+) *$").expect("trailing breaks pattern is valid"));

fn whitespace(text: &str) -> SqlElement {
    new_token(TokenType::Whitespace, text).into()
}

/// Removes comments, leaving a line break or a space where needed
pub struct StripCommentsFilter;

impl StripCommentsFilter {
    /// Token standing in for `comment`: its trailing line breaks, or one space
    fn stand_in(comment: &SqlElement) -> SqlElement {
        let text = comment.value();
        match TRAILING_BREAKS.captures(&text).and_then(|caps| caps.get(1)) {
            Some(breaks) => new_token(TokenType::Newline, breaks.as_str()).into(),
            None => whitespace(" "),
        }
    }

    fn strip(tlist: &SqlNode) {
        for child in tlist.children().collect::<Vec<_>>() {
            if !child.is_node(NodeKind::Comment) {
                Self::strip(&child);
            }
        }

        loop {
            let children = tlist.tokens();
            let Some(idx) = children.iter().position(ElementExt::is_comment) else {
                break;
            };
            let comment = &children[idx];
            let prev = idx.checked_sub(1).map(|i| &children[i]);
            let next = children.get(idx + 1);
            let stand_in = Self::stand_in(comment);

            let at_edge = match (prev, next) {
                (Some(prev), Some(next)) => {
                    prev.is_whitespace()
                        || prev.is_punct("(")
                        || next.is_whitespace()
                        || next.is_punct(")")
                }
                _ => true,
            };
            detach_element(comment);
            if !at_edge || prev.is_some_and(|prev| !prev.is_punct("(")) {
                tlist.insert_before(idx, stand_in);
            }
        }
    }
}

impl StatementFilter for StripCommentsFilter {
    fn process(&mut self, statement: &SqlNode) {
        Self::strip(statement);
    }
}

/// Collapses whitespace runs to single spaces
///
/// Leading whitespace of each node is dropped, as is whitespace before a
/// list comma, just inside parentheses and at the end of the statement.
pub struct StripWhitespaceFilter;

impl StripWhitespaceFilter {
    fn strip(tlist: &SqlNode, depth: usize) {
        for child in tlist.children().collect::<Vec<_>>() {
            Self::strip(&child, depth + 1);
        }

        match tlist.kind().node_kind() {
            Some(NodeKind::IdentifierList) => Self::strip_identifier_list(tlist),
            Some(NodeKind::Parenthesis) => Self::strip_parenthesis(tlist),
            _ => {}
        }
        Self::collapse(tlist);

        if depth == 0 {
            while let Some(last) = tlist.last_child_or_token() {
                if !last.is_whitespace() {
                    break;
                }
                detach_element(&last);
            }
        }
    }

    fn collapse(tlist: &SqlNode) {
        let mut last_was_ws = false;
        let mut is_first = true;
        for child in tlist.tokens() {
            let is_ws = child.is_whitespace();
            if is_ws {
                if last_was_ws || is_first {
                    detach_element(&child);
                } else if let Some(token) = child.as_token() {
                    if token.text() != " " || token.kind().token_type() != Some(TokenType::Whitespace)
                    {
                        replace_token(token, TokenType::Whitespace, " ");
                    }
                }
            }
            last_was_ws = is_ws;
            is_first = false;
        }
    }

    fn strip_identifier_list(tlist: &SqlNode) {
        let mut last_ws: Option<SqlElement> = None;
        for child in tlist.tokens() {
            if child.is_punct(",") {
                if let Some(ws) = last_ws.take() {
                    detach_element(&ws);
                }
            }
            last_ws = child.is_whitespace().then_some(child);
        }
    }

    fn strip_parenthesis(tlist: &SqlNode) {
        while tlist.child(1).is_some_and(|child| child.is_whitespace()) {
            if let Some(child) = tlist.child(1) {
                detach_element(&child);
            }
        }
        while let Some(before_close) = Self::before_close(tlist) {
            if !before_close.is_whitespace() {
                if let Some(group) = before_close.as_node() {
                    while let Some(last) = group.last_child_or_token() {
                        if !last.is_whitespace() {
                            break;
                        }
                        detach_element(&last);
                    }
                }
                break;
            }
            detach_element(&before_close);
        }
    }

    /// Second-to-last child of a closed parenthesis
    fn before_close(tlist: &SqlNode) -> Option<SqlElement> {
        let len = tlist.child_count();
        if len < 3 || !tlist.child(len - 1).is_some_and(|last| last.is_punct(")")) {
            return None;
        }
        tlist.child(len - 2)
    }
}

impl StatementFilter for StripWhitespaceFilter {
    fn process(&mut self, statement: &SqlNode) {
        Self::strip(statement, 0);
    }
}

/// Breaks lines that would grow past a column limit
///
/// The break goes before the first leaf that does not fit and repeats the
/// current line's indentation.
pub struct RightMarginFilter {
    width: usize,
    line: String,
}

impl RightMarginFilter {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            line: String::new(),
        }
    }
}

impl StatementFilter for RightMarginFilter {
    fn process(&mut self, statement: &SqlNode) {
        let leaves: Vec<_> = statement.flatten().collect();
        let mut prev_ws = None;
        for leaf in leaves {
            let text = leaf.text().to_string();
            if leaf.is_whitespace() && text.contains(['\n', '\r']) {
                self.line = text
                    .rsplit(['\n', '\r'])
                    .next()
                    .unwrap_or_default()
                    .to_string();
                prev_ws = None;
                continue;
            }
            if leaf.is_whitespace() {
                self.line.push_str(&text);
                prev_ws = Some(leaf);
                continue;
            }

            let indent: String = self.line.chars().take_while(|c| *c == ' ').collect();
            let overflows = self.line.chars().count() + text.chars().count() > self.width;
            if overflows && self.line.len() > indent.len() {
                let line_break = format!("\n{indent}");
                match prev_ws.take() {
                    Some(ws) => {
                        replace_token(&ws, TokenType::Newline, &line_break);
                    }
                    None => {
                        if let Some(parent) = leaf.parent() {
                            parent.insert_before(
                                leaf.index(),
                                new_token(TokenType::Newline, &line_break).into(),
                            );
                        }
                    }
                }
                self.line = indent;
            }
            prev_ws = None;
            self.line.push_str(&text);
            if let Some(pos) = text.rfind(['\n', '\r']) {
                self.line = text[pos + 1..].to_string();
            }
        }
    }
}

/// Changes the letter case of keywords
pub struct KeywordCaseFilter {
    case: Case,
}

impl KeywordCaseFilter {
    pub fn new(case: Case) -> Self {
        Self { case }
    }
}

impl StatementFilter for KeywordCaseFilter {
    fn process(&mut self, statement: &SqlNode) {
        let keywords: Vec<_> = statement
            .flatten()
            .filter(|token| token.is_keyword())
            .collect();
        for token in keywords {
            let converted = self.case.apply(token.text());
            if converted != token.text() {
                replace_token_text(&token, &converted);
            }
        }
    }
}

/// Changes the letter case of unquoted names
pub struct IdentifierCaseFilter {
    case: Case,
}

impl IdentifierCaseFilter {
    pub fn new(case: Case) -> Self {
        Self { case }
    }
}

impl StatementFilter for IdentifierCaseFilter {
    fn process(&mut self, statement: &SqlNode) {
        let names: Vec<_> = statement
            .flatten()
            .filter(|token| {
                matches!(
                    token.ttype(),
                    Some(TokenType::Name | TokenType::StringSymbol)
                ) && !token.text().trim_start().starts_with('"')
            })
            .collect();
        for token in names {
            let converted = self.case.apply(token.text());
            if converted != token.text() {
                replace_token_text(&token, &converted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;

    fn run(filter: &mut dyn StatementFilter, sql: &str) -> String {
        parse(sql)
            .iter()
            .map(|statement| {
                filter.process(statement);
                statement.text().to_string()
            })
            .collect()
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(
            run(&mut StripCommentsFilter, "select a -- note\nfrom t"),
            "select a \nfrom t"
        );
        assert_eq!(run(&mut StripCommentsFilter, "select/* x */a"), "select a");
        assert_eq!(run(&mut StripCommentsFilter, "-- lead\nselect 1"), "select 1");
        assert_eq!(run(&mut StripCommentsFilter, "select (/* x */1)"), "select (1)");
    }

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(
            run(&mut StripWhitespaceFilter, "  select   a ,\n b\nfrom  t  \n"),
            "select a, b from t"
        );
        assert_eq!(run(&mut StripWhitespaceFilter, "select ( 1 )"), "select (1)");
    }

    #[test]
    fn test_keyword_case() {
        assert_eq!(
            run(&mut KeywordCaseFilter::new(Case::Upper), "select a from t order by a"),
            "SELECT a FROM t ORDER BY a"
        );
        assert_eq!(
            run(&mut KeywordCaseFilter::new(Case::Capitalize), "SELECT 1"),
            "Select 1"
        );
    }

    #[test]
    fn test_identifier_case() {
        assert_eq!(
            run(&mut IdentifierCaseFilter::new(Case::Upper), "select a, \"b\" from t"),
            "select A, \"b\" from T"
        );
    }

    #[test]
    fn test_right_margin() {
        let out = run(
            &mut RightMarginFilter::new(20),
            "select aaaa, bbbb, cccc, dddd from t",
        );
        assert!(out.lines().all(|line| line.len() <= 20), "{out}");
        assert_eq!(out.replace('\n', " "), "select aaaa, bbbb, cccc, dddd from t");
    }
}
