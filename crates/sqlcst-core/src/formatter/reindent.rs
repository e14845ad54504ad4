//! Reindenting filter
//!
//! Works on statements whose whitespace was already collapsed. Line breaks are
//! inserted as `Newline` tokens carrying the indentation of the next line;
//! the column of an element is measured on the statement text before it.

use super::StatementFilter;
use crate::config::FormatOptions;
use crate::cst::ast::{AstNode, IdentifierList};
use crate::cst::{
    ElementExt, NodeKind, SqlElement, SqlNode, TokenList, TokenType, detach_element, new_token,
};

/// Keywords that start a new line at the current indentation
const SPLIT_KEYWORDS: &[&str] = &[
    "FROM",
    "AND",
    "OR",
    "GROUP BY",
    "ORDER BY",
    "UNION",
    "UNION ALL",
    "VALUES",
    "SET",
    "BETWEEN",
    "EXCEPT",
    "HAVING",
    "LIMIT",
];

fn is_split_keyword(element: &SqlElement) -> bool {
    element.matches(TokenType::Keyword, &[]) && {
        let normalized = element.normalized();
        normalized.ends_with("JOIN") || SPLIT_KEYWORDS.contains(&normalized.as_str())
    }
}

/// Next split keyword at or after `from`; the `AND` of `BETWEEN .. AND` is not one
fn next_split_keyword(children: &[SqlElement], from: usize) -> Option<usize> {
    let idx = (from..children.len()).find(|&i| is_split_keyword(&children[i]))?;
    if children[idx].normalized() != "BETWEEN" {
        return Some(idx);
    }
    let after = next_split_keyword(children, idx + 1)?;
    if children[after].normalized() == "AND" {
        next_split_keyword(children, after + 1)
    } else {
        Some(after)
    }
}

fn is_statement_keyword(element: &SqlElement) -> bool {
    matches!(
        element.ttype(),
        Some(TokenType::KeywordDml | TokenType::KeywordDdl)
    )
}

fn char_len(element: &SqlElement) -> isize {
    element.value().chars().count() as isize
}

pub struct ReindentFilter {
    width: usize,
    wrap_after: usize,
    comma_first: bool,
    indent_columns: bool,
    compact: bool,
    indent: usize,
    offset: isize,
    statement: Option<SqlNode>,
    last_function: Option<SqlElement>,
    previous_ends_with_newline: Option<bool>,
}

impl ReindentFilter {
    pub fn new(options: &FormatOptions) -> Self {
        Self {
            width: options.indent_width,
            wrap_after: options.wrap_after,
            comma_first: options.comma_first,
            indent_columns: options.indent_columns,
            compact: options.compact,
            indent: usize::from(options.indent_after_first),
            offset: 0,
            statement: None,
            last_function: None,
            previous_ends_with_newline: None,
        }
    }

    fn leading_ws(&self) -> isize {
        (self.indent * self.width) as isize + self.offset
    }

    /// Line break followed by the current indentation plus `extra` columns
    fn nl(&self, extra: isize) -> SqlElement {
        let spaces = (self.leading_ws() + extra).max(0) as usize;
        new_token(TokenType::Newline, &format!("\n{}", " ".repeat(spaces))).into()
    }

    fn indented<R>(&mut self, steps: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent += steps;
        let result = f(self);
        self.indent -= steps;
        result
    }

    fn shifted<R>(&mut self, columns: isize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.offset += columns;
        let result = f(self);
        self.offset -= columns;
        result
    }

    /// Column of `element`'s first leaf, relative to the current indentation
    fn column_of(&self, element: &SqlElement) -> isize {
        let Some(statement) = &self.statement else {
            return 0;
        };
        let target = match element {
            SqlElement::Node(node) => node.first_token(),
            SqlElement::Token(token) => Some(token.clone()),
        };
        let mut line_len = 0usize;
        for leaf in statement.flatten() {
            if Some(&leaf) == target.as_ref() {
                break;
            }
            let text = leaf.text();
            match text.rfind(['\n', '\r']) {
                Some(pos) => line_len = text[pos + 1..].chars().count(),
                None => line_len += text.chars().count(),
            }
        }
        line_len as isize - self.leading_ws()
    }

    fn process_node(&mut self, tlist: &SqlNode) {
        match tlist.kind().node_kind() {
            Some(NodeKind::Where) => self.process_clause(tlist, "WHERE"),
            Some(NodeKind::Having) => self.process_clause(tlist, "HAVING"),
            Some(NodeKind::Parenthesis) => self.process_parenthesis(tlist),
            Some(NodeKind::IdentifierList) => self.process_identifier_list(tlist),
            Some(NodeKind::Case) => self.process_case(tlist),
            Some(NodeKind::Values) => self.process_values(tlist),
            Some(NodeKind::Function) => {
                self.last_function = tlist.child(0);
                self.process_default(tlist, true);
            }
            _ => self.process_default(tlist, true),
        }
    }

    fn process_default(&mut self, tlist: &SqlNode, split_statements: bool) {
        if split_statements {
            self.split_statements(tlist);
        }
        self.split_keywords(tlist);
        for child in tlist.children().collect::<Vec<_>>() {
            self.process_node(&child);
        }
    }

    /// Break before every DML or DDL keyword that does not open the list
    fn split_statements(&self, tlist: &SqlNode) {
        let mut from = 0;
        loop {
            let children = tlist.tokens();
            let Some(mut idx) = (from..children.len()).find(|&i| is_statement_keyword(&children[i]))
            else {
                break;
            };
            if let Some(prev) = idx.checked_sub(1).map(|i| &children[i]) {
                if prev.is_whitespace() {
                    detach_element(prev);
                    idx -= 1;
                }
                tlist.insert_before(idx, self.nl(0));
                idx += 1;
            }
            from = idx + 1;
        }
    }

    fn split_keywords(&self, tlist: &SqlNode) {
        let mut from = 0;
        loop {
            let children = tlist.tokens();
            let Some(mut idx) = next_split_keyword(&children, from) else {
                break;
            };
            if let Some(prev) = idx.checked_sub(1).map(|i| &children[i]) {
                let ends_with_break = prev.value().ends_with(['\n', '\r']);
                if prev.is_whitespace() {
                    detach_element(prev);
                    idx -= 1;
                }
                if !ends_with_break {
                    tlist.insert_before(idx, self.nl(0));
                    idx += 1;
                }
            }
            from = idx + 1;
        }
    }

    fn process_clause(&mut self, tlist: &SqlNode, keyword: &str) {
        let Some(idx) = tlist
            .tokens()
            .iter()
            .position(|child| child.matches(TokenType::Keyword, &[keyword]))
        else {
            return;
        };
        tlist.insert_before(idx, self.nl(0));
        self.indented(1, |this| this.process_default(tlist, true));
    }

    /// Sub-queries move to their own line one step in; any content aligns
    /// just after the opening bracket
    fn process_parenthesis(&mut self, tlist: &SqlNode) {
        let is_subquery = tlist.tokens().iter().any(is_statement_keyword);
        self.indented(usize::from(is_subquery), |this| {
            if is_subquery {
                tlist.insert_before(0, this.nl(0));
            }
            let open = tlist
                .tokens()
                .into_iter()
                .find(|child| child.is_punct("("));
            let column = open.map_or(0, |open| this.column_of(&open)) + 1;
            this.shifted(column, |this| this.process_default(tlist, !is_subquery));
        });
    }

    fn process_identifier_list(&mut self, tlist: &SqlNode) {
        let identifiers = IdentifierList::cast(tlist.clone())
            .map(|list| list.items())
            .unwrap_or_default();
        let Some(first) = identifiers.first().cloned() else {
            self.process_default(tlist, true);
            return;
        };

        if tlist.is_within(NodeKind::Function) || tlist.is_within(NodeKind::Values) {
            self.wrap_arguments(tlist, &identifiers[1..]);
        } else if self.indent_columns {
            let width = self.width as isize;
            self.shifted(width, |this| this.wrap_items(tlist, &identifiers));
        } else {
            let column = self.column_of(&first);
            self.shifted(column, |this| this.wrap_items(tlist, &identifiers[1..]));
        }
        self.process_default(tlist, true);
    }

    /// Break before each item once the line passes `wrap_after`
    fn wrap_items(&self, tlist: &SqlNode, items: &[SqlElement]) {
        let limit = self.wrap_after as isize - self.offset;
        let mut position = 0;
        for item in items {
            position += char_len(item) + 1;
            if position <= limit {
                continue;
            }
            let target = if self.comma_first {
                let comma = tlist
                    .token_index(item)
                    .and_then(|idx| tlist.token_prev(idx, true, false));
                match comma {
                    Some((_, comma)) => comma,
                    None => continue,
                }
            } else {
                item.clone()
            };
            let Some(idx) = tlist.token_index(&target) else {
                continue;
            };
            let adjust = if self.comma_first { -2 } else { 0 };
            tlist.insert_before(idx, self.nl(adjust));
            if self.comma_first {
                let comma_idx = idx + 1;
                let spaced = tlist
                    .token_next(comma_idx, false, false)
                    .is_some_and(|(_, next)| next.ttype() == Some(TokenType::Whitespace));
                if !spaced {
                    tlist.insert_after(
                        comma_idx,
                        new_token(TokenType::Whitespace, " ").into(),
                        false,
                    );
                }
            }
            position = 0;
        }
    }

    /// Argument lists stay inline unless `wrap_after` is set and exceeded
    fn wrap_arguments(&mut self, tlist: &SqlNode, items: &[SqlElement]) {
        for comma in tlist.tokens().iter().filter(|child| child.is_punct(",")) {
            let Some(idx) = tlist.token_index(comma) else {
                continue;
            };
            let next = tlist.token_next(idx, false, false);
            if next.is_some_and(|(_, next)| !next.is_whitespace()) {
                tlist.insert_after(idx, new_token(TokenType::Whitespace, " ").into(), false);
            }
        }

        if self.wrap_after == 0 {
            return;
        }
        let end_at = self.offset + items.iter().map(|item| char_len(item) + 1).sum::<isize>();
        let limit = self.wrap_after as isize - self.offset;
        let adjusted = match &self.last_function {
            Some(function) if end_at > limit => -char_len(function) - 1,
            _ => 0,
        };

        self.shifted(adjusted, |this| {
            this.indented(1, |this| {
                if adjusted < 0 {
                    if let Some(idx) = items.first().and_then(|item| tlist.token_index(item)) {
                        tlist.insert_before(idx, this.nl(0));
                    }
                }
                let limit = this.wrap_after as isize - this.offset;
                let mut position = 0;
                for item in items {
                    position += char_len(item) + 1;
                    if position > limit {
                        if let Some(idx) = tlist.token_index(item) {
                            tlist.insert_before(idx, this.nl(0));
                        }
                        position = 0;
                    }
                }
            });
        });
    }

    /// `WHEN` and `ELSE` branches one step in from `CASE`, `END` under `CASE`
    fn process_case(&mut self, tlist: &SqlNode) {
        let Some(case_keyword) = tlist.child(0) else {
            return;
        };
        let column = self.column_of(&case_keyword);
        self.shifted(column, |this| {
            if !this.compact {
                let step = this.width as isize;
                this.shifted(step, |this| {
                    let branches: Vec<SqlElement> = tlist
                        .tokens()
                        .into_iter()
                        .filter(|child| child.matches(TokenType::Keyword, &["WHEN", "ELSE"]))
                        .collect();
                    for keyword in &branches {
                        this.break_before(tlist, keyword, 0);
                    }
                });
            }
            let inner = this.width as isize + "WHEN ".len() as isize;
            this.shifted(inner, |this| this.process_default(tlist, true));
            if !this.compact {
                let end = tlist
                    .tokens()
                    .into_iter()
                    .rfind(|child| child.matches(TokenType::Keyword, &["END"]));
                if let Some(end) = end {
                    this.break_before(tlist, &end, 0);
                }
            }
        });
    }

    /// Replace the whitespace before `element` with a line break
    fn break_before(&self, tlist: &SqlNode, element: &SqlElement, extra: isize) {
        let Some(mut idx) = tlist.token_index(element) else {
            return;
        };
        if let Some((prev_idx, prev)) = tlist.token_prev(idx, false, false) {
            if prev.is_whitespace() {
                detach_element(&prev);
                idx = prev_idx;
            }
        }
        tlist.insert_before(idx, self.nl(extra));
    }

    /// `VALUES` starts a line; each further tuple aligns under the first
    fn process_values(&mut self, tlist: &SqlNode) {
        tlist.insert_before(0, self.nl(0));
        if self.compact {
            return;
        }
        let Some(first_tuple) = tlist
            .tokens()
            .into_iter()
            .find(|child| child.is_node(NodeKind::Parenthesis))
        else {
            return;
        };
        let column = self.column_of(&first_tuple);

        let commas: Vec<SqlElement> = tlist
            .tokens()
            .into_iter()
            .filter(|child| child.is_punct(","))
            .collect();
        for comma in &commas {
            if self.comma_first {
                self.break_before(tlist, comma, column - 2);
                continue;
            }
            let Some(idx) = tlist.token_index(comma) else {
                continue;
            };
            if let Some((_, next)) = tlist.token_next(idx, false, false) {
                if next.is_whitespace() {
                    detach_element(&next);
                }
            }
            tlist.insert_after(idx, self.nl(column), false);
        }
    }
}

impl StatementFilter for ReindentFilter {
    fn process(&mut self, statement: &SqlNode) {
        if statement.first_child_or_token().is_none() {
            return;
        }
        self.statement = Some(statement.clone());
        self.process_node(statement);
        if let Some(ends_with_newline) = self.previous_ends_with_newline {
            let separator = if ends_with_newline { "\n" } else { "\n\n" };
            statement.insert_before(0, new_token(TokenType::Newline, separator).into());
        }
        self.previous_ends_with_newline = Some(statement.text().to_string().ends_with('\n'));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;
    use crate::formatter::filters::StripWhitespaceFilter;
    use crate::formatter::output::serialize;

    fn reindent(sql: &str, options: FormatOptions) -> String {
        let mut strip = StripWhitespaceFilter;
        let mut filter = ReindentFilter::new(&options);
        parse(sql)
            .iter()
            .map(|statement| {
                strip.process(statement);
                filter.process(statement);
                serialize(&statement.text().to_string())
            })
            .collect()
    }

    #[test]
    fn test_clauses_and_lists() {
        let out = reindent(
            "select a, b from t where x = 1 and y = 2",
            FormatOptions::default(),
        );
        assert_eq!(out, "select a,\n       b\nfrom t\nwhere x = 1\n  and y = 2");
    }

    #[test]
    fn test_between_and_is_not_split() {
        let out = reindent(
            "select a from t where x between 1 and 2",
            FormatOptions::default(),
        );
        assert_eq!(out, "select a\nfrom t\nwhere x between 1 and 2");
    }

    #[test]
    fn test_statements_separated_by_blank_line() {
        let out = reindent("select 1; select 2;", FormatOptions::default());
        assert_eq!(out, "select 1;\n\nselect 2;");
    }

    #[test]
    fn test_function_arguments_stay_inline() {
        let out = reindent("select f(a,b) from t", FormatOptions::default());
        assert_eq!(out, "select f(a, b)\nfrom t");
    }

    #[test]
    fn test_indent_width() {
        let options = FormatOptions {
            indent_width: 4,
            ..Default::default()
        };
        let out = reindent("select a from t where x = 1 or y = 2", options);
        assert_eq!(out, "select a\nfrom t\nwhere x = 1\n    or y = 2");
    }
}
