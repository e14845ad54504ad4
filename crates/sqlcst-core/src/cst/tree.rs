//! Navigation and in-place mutation of statement trees
//!
//! Statement trees are rowan *mutable* trees: grouping and the formatter
//! filters rewrite them in place by moving contiguous child ranges into new
//! nodes. Every operation here preserves the leaf sequence unless the caller
//! explicitly inserts or replaces tokens.
//!
//! Child positions are plain `usize` indices into
//! [`children_with_tokens`](rowan::SyntaxNode::children_with_tokens).

use std::fmt::Write as _;

use rowan::{GreenNodeBuilder, NodeOrToken};

use super::lexer::normalize_keyword;
use super::{NodeKind, SqlElement, SqlNode, SqlToken, TokenType};

/// Create a detached, mutable token
pub fn new_token(ttype: TokenType, text: &str) -> SqlToken {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(NodeKind::Statement.into());
    builder.token(ttype.into(), text);
    builder.finish_node();
    let root = SqlNode::new_root_mut(builder.finish());
    let token = root
        .first_token()
        .expect("a node built around one token has a first token");
    token.detach();
    token
}

/// Create an empty, detached, mutable node
pub fn new_node(kind: NodeKind) -> SqlNode {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(kind.into());
    builder.finish_node();
    SqlNode::new_root_mut(builder.finish())
}

/// Swap `token` for a new token of the same type holding `text`
///
/// Returns the replacement, which takes the old token's place in its parent.
pub fn replace_token_text(token: &SqlToken, text: &str) -> SqlToken {
    let ttype = token.kind().token_type().unwrap_or(TokenType::Error);
    replace_token(token, ttype, text)
}

/// Swap `token` for a new `ttype` token holding `text`
pub fn replace_token(token: &SqlToken, ttype: TokenType, text: &str) -> SqlToken {
    let replacement = new_token(ttype, text);
    if let Some(parent) = token.parent() {
        let index = token.index();
        parent.splice_children(index..index + 1, vec![replacement.clone().into()]);
    }
    replacement
}

/// Remove `element` from its parent, if it has one
pub fn detach_element(element: &SqlElement) {
    element.detach();
}

/// Next sibling that is not whitespace
pub fn next_significant(element: &SqlElement) -> Option<SqlElement> {
    let mut current = element.next_sibling_or_token();
    while let Some(sibling) = current {
        if !sibling.is_whitespace() {
            return Some(sibling);
        }
        current = sibling.next_sibling_or_token();
    }
    None
}

/// Previous sibling that is not whitespace
pub fn prev_significant(element: &SqlElement) -> Option<SqlElement> {
    let mut current = element.prev_sibling_or_token();
    while let Some(sibling) = current {
        if !sibling.is_whitespace() {
            return Some(sibling);
        }
        current = sibling.prev_sibling_or_token();
    }
    None
}

/// Detach `count` siblings starting at `first`, in order
///
/// Each element is detached before the next one is looked up, so the parent
/// never holds more than a couple of live cursors while the run moves.
fn detach_run(first: SqlElement, count: usize) -> Vec<SqlElement> {
    let mut moved = Vec::with_capacity(count);
    let mut current = Some(first);
    while moved.len() < count {
        let Some(element) = current else {
            break;
        };
        current = element.next_sibling_or_token();
        element.detach();
        moved.push(element);
    }
    moved
}

/// Move the siblings `first..=last` into a new node of `kind`
///
/// The new node takes their place and is returned. Only the moved run is
/// visited; the siblings before it are never re-read.
///
/// # Panics
///
/// When `last` is neither `first` nor a later sibling of it.
pub fn group_siblings(kind: NodeKind, first: &SqlElement, last: &SqlElement) -> SqlNode {
    let parent = first.parent();
    assert!(
        parent.is_some() && parent == last.parent() && first.index() <= last.index(),
        "group_siblings: {}..={} is not a run of siblings",
        first.index(),
        last.index()
    );
    let start = first.index();
    let moved = detach_run(first.clone(), last.index() - start + 1);

    let group = new_node(kind);
    group.splice_children(0..0, moved);
    if let Some(parent) = parent {
        parent.splice_children(start..start, vec![group.clone().into()]);
    }
    group
}

/// Append the siblings after `group` up to and including `last` to `group`
///
/// # Panics
///
/// When `last` is not a later sibling of `group`.
pub fn extend_group(group: &SqlNode, last: &SqlElement) -> SqlNode {
    let parent = group.parent();
    assert!(
        parent.is_some() && parent == last.parent() && group.index() < last.index(),
        "extend_group: {} is not a later sibling of {}",
        last.index(),
        group.index()
    );
    let count = last.index() - group.index();
    let moved = match group.next_sibling_or_token() {
        Some(first) => detach_run(first, count),
        None => Vec::new(),
    };
    let at = group.green().children().len();
    group.splice_children(at..at, moved);
    group.clone()
}

fn is_skipped(element: &SqlElement, skip_ws: bool, skip_cm: bool) -> bool {
    (skip_ws && element.is_whitespace()) || (skip_cm && element.is_comment())
}

/// Navigation and mutation API shared by every composite node
pub trait TokenList {
    /// Depth-first leaf tokens in document order
    ///
    /// Each call starts a fresh traversal.
    fn flatten(&self) -> impl Iterator<Item = SqlToken>;

    /// Snapshot of the direct children
    fn tokens(&self) -> Vec<SqlElement>;

    fn child_count(&self) -> usize;

    /// Child at `index`
    fn child(&self, index: usize) -> Option<SqlElement>;

    /// First child, optionally skipping whitespace and comments
    fn token_first(&self, skip_ws: bool, skip_cm: bool) -> Option<(usize, SqlElement)>;

    /// First child after `index` that is not skipped
    fn token_next(&self, index: usize, skip_ws: bool, skip_cm: bool)
    -> Option<(usize, SqlElement)>;

    /// Last child before `index` that is not skipped
    fn token_prev(&self, index: usize, skip_ws: bool, skip_cm: bool)
    -> Option<(usize, SqlElement)>;

    /// Position of `element` among the direct children
    fn token_index(&self, element: &SqlElement) -> Option<usize>;

    /// Move children `start..end` (or `start..=end`) into a new node of `kind`
    ///
    /// The new node takes their place and is returned.
    ///
    /// # Panics
    ///
    /// When the range is empty or reaches past the last child.
    fn replace_range(&self, kind: NodeKind, start: usize, end: usize, include_end: bool)
    -> SqlNode;

    /// Append children after `start` up to `end` to the node at `start`
    ///
    /// # Panics
    ///
    /// When the child at `start` is not a node or the range is out of bounds.
    fn extend_range(&self, start: usize, end: usize, include_end: bool) -> SqlNode;

    /// Insert a detached `element` at position `index`
    ///
    /// # Panics
    ///
    /// When `element` is still attached or `index` is past the end.
    fn insert_before(&self, index: usize, element: SqlElement);

    /// Insert a detached `element` after the child at `index`
    ///
    /// With `skip_ws` the element goes in front of the next non-whitespace
    /// child instead. Appends when there is no such child.
    fn insert_after(&self, index: usize, element: SqlElement, skip_ws: bool);

    /// Leaf covering byte `offset` of this node's text
    fn leaf_at_offset(&self, offset: usize) -> Option<SqlToken>;

    /// Indented dump of kinds and token texts, one element per line
    fn pprint_tree(&self) -> String;
}

impl TokenList for SqlNode {
    fn flatten(&self) -> impl Iterator<Item = SqlToken> {
        self.descendants_with_tokens()
            .filter_map(NodeOrToken::into_token)
    }

    fn tokens(&self) -> Vec<SqlElement> {
        self.children_with_tokens().collect()
    }

    fn child_count(&self) -> usize {
        self.green().children().len()
    }

    fn child(&self, index: usize) -> Option<SqlElement> {
        self.children_with_tokens().nth(index)
    }

    fn token_first(&self, skip_ws: bool, skip_cm: bool) -> Option<(usize, SqlElement)> {
        self.children_with_tokens()
            .enumerate()
            .find(|(_, element)| !is_skipped(element, skip_ws, skip_cm))
    }

    fn token_next(
        &self,
        index: usize,
        skip_ws: bool,
        skip_cm: bool,
    ) -> Option<(usize, SqlElement)> {
        self.children_with_tokens()
            .enumerate()
            .skip(index + 1)
            .find(|(_, element)| !is_skipped(element, skip_ws, skip_cm))
    }

    fn token_prev(
        &self,
        index: usize,
        skip_ws: bool,
        skip_cm: bool,
    ) -> Option<(usize, SqlElement)> {
        let before: Vec<SqlElement> = self.children_with_tokens().take(index).collect();
        before
            .into_iter()
            .enumerate()
            .rev()
            .find(|(_, element)| !is_skipped(element, skip_ws, skip_cm))
    }

    fn token_index(&self, element: &SqlElement) -> Option<usize> {
        (element.parent().as_ref() == Some(self)).then(|| element.index())
    }

    fn replace_range(
        &self,
        kind: NodeKind,
        start: usize,
        end: usize,
        include_end: bool,
    ) -> SqlNode {
        let end = if include_end { end + 1 } else { end };
        let len = self.child_count();
        assert!(
            start < end && end <= len,
            "replace_range {start}..{end} out of bounds for {len} children"
        );
        match (self.child(start), self.child(end - 1)) {
            (Some(first), Some(last)) => group_siblings(kind, &first, &last),
            _ => unreachable!("replace_range bounds were checked"),
        }
    }

    fn extend_range(&self, start: usize, end: usize, include_end: bool) -> SqlNode {
        let end = if include_end { end + 1 } else { end };
        let len = self.child_count();
        assert!(
            start < end && end <= len,
            "extend_range {start}..{end} out of bounds for {len} children"
        );
        let Some(NodeOrToken::Node(group)) = self.child(start) else {
            panic!("extend_range: child {start} is not a node");
        };
        if end - start == 1 {
            return group;
        }
        match self.child(end - 1) {
            Some(last) => extend_group(&group, &last),
            None => unreachable!("extend_range bounds were checked"),
        }
    }

    fn insert_before(&self, index: usize, element: SqlElement) {
        assert!(
            element.parent().is_none(),
            "insert_before: element is still attached"
        );
        let len = self.child_count();
        assert!(index <= len, "insert_before: index {index} past {len} children");
        self.splice_children(index..index, vec![element]);
    }

    fn insert_after(&self, index: usize, element: SqlElement, skip_ws: bool) {
        match self.token_next(index, skip_ws, false) {
            Some((next, _)) => self.insert_before(next, element),
            None => self.insert_before(self.child_count(), element),
        }
    }

    fn leaf_at_offset(&self, offset: usize) -> Option<SqlToken> {
        let mut start = 0;
        for token in self.flatten() {
            let end = start + token.text().len();
            if (start..end).contains(&offset) {
                return Some(token);
            }
            start = end;
        }
        None
    }

    fn pprint_tree(&self) -> String {
        let mut out = String::new();
        for (depth, element) in walk(self) {
            let indent = "  ".repeat(depth);
            let _ = match &element {
                NodeOrToken::Node(node) => match node.kind().node_kind() {
                    Some(kind) => writeln!(out, "{indent}{kind}"),
                    None => writeln!(out, "{indent}?"),
                },
                NodeOrToken::Token(token) => {
                    let ttype = token.kind().token_type().unwrap_or(TokenType::Error);
                    writeln!(out, "{indent}{ttype} {:?}", token.text())
                }
            };
        }
        out
    }
}

/// Preorder walk with depth, starting at `root` (depth 0)
fn walk(root: &SqlNode) -> Vec<(usize, SqlElement)> {
    let mut out = Vec::new();
    let mut stack = vec![(0usize, SqlElement::from(root.clone()))];
    while let Some((depth, element)) = stack.pop() {
        if let NodeOrToken::Node(node) = &element {
            let children: Vec<SqlElement> = node.children_with_tokens().collect();
            stack.extend(children.into_iter().rev().map(|child| (depth + 1, child)));
        }
        out.push((depth, element));
    }
    out
}

/// Classification helpers for any tree element
pub trait ElementExt {
    fn to_element(&self) -> SqlElement;

    /// Token type; `None` for nodes
    fn ttype(&self) -> Option<TokenType> {
        self.to_element().kind().token_type()
    }

    /// Node kind; `None` for tokens
    fn node_kind(&self) -> Option<NodeKind> {
        self.to_element().kind().node_kind()
    }

    /// Token whose type is `category` or one of its descendants
    fn is_a(&self, category: TokenType) -> bool {
        self.ttype().is_some_and(|ttype| ttype.is_a(category))
    }

    fn is_node(&self, kind: NodeKind) -> bool {
        self.node_kind() == Some(kind)
    }

    fn is_group(&self) -> bool {
        self.node_kind().is_some()
    }

    fn is_whitespace(&self) -> bool {
        self.is_a(TokenType::Whitespace)
    }

    fn is_newline(&self) -> bool {
        self.ttype() == Some(TokenType::Newline)
    }

    fn is_keyword(&self) -> bool {
        self.is_a(TokenType::Keyword)
    }

    /// Comment tokens and grouped comment runs
    fn is_comment(&self) -> bool {
        self.is_a(TokenType::Comment) || self.is_node(NodeKind::Comment)
    }

    /// Source text covered by the element
    fn value(&self) -> String {
        match self.to_element() {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        }
    }

    /// Upper-cased, whitespace-collapsed text for keywords; raw text otherwise
    fn normalized(&self) -> String {
        if self.is_keyword() {
            normalize_keyword(&self.value())
        } else {
            self.value()
        }
    }

    /// Token of exactly `ttype` whose text is one of `values`
    ///
    /// Keywords compare case-insensitively. An empty `values` matches on the
    /// type alone.
    fn matches(&self, ttype: TokenType, values: &[&str]) -> bool {
        if self.ttype() != Some(ttype) {
            return false;
        }
        if values.is_empty() {
            return true;
        }
        if self.is_keyword() {
            let normalized = self.normalized();
            values
                .iter()
                .any(|value| normalize_keyword(value) == normalized)
        } else {
            let value = self.value();
            values.iter().any(|candidate| *candidate == value)
        }
    }

    /// Keyword whose normalized text is one of `values`, any keyword subtype
    fn is_keyword_in(&self, values: &[&str]) -> bool {
        self.is_keyword() && {
            let normalized = self.normalized();
            values.iter().any(|value| *value == normalized)
        }
    }

    /// Punctuation token with text `value`
    fn is_punct(&self, value: &str) -> bool {
        self.ttype() == Some(TokenType::Punctuation) && self.value() == value
    }

    fn parent_node(&self) -> Option<SqlNode> {
        self.to_element().parent()
    }

    /// Some ancestor has `kind`
    fn is_within(&self, kind: NodeKind) -> bool {
        self.parent_node().is_some_and(|parent| {
            parent
                .ancestors()
                .any(|ancestor| ancestor.kind().node_kind() == Some(kind))
        })
    }

    fn is_direct_child_of(&self, node: &SqlNode) -> bool {
        self.parent_node().as_ref() == Some(node)
    }

    fn has_ancestor(&self, node: &SqlNode) -> bool {
        self.parent_node()
            .is_some_and(|parent| parent.ancestors().any(|ancestor| &ancestor == node))
    }
}

impl ElementExt for SqlElement {
    fn to_element(&self) -> SqlElement {
        self.clone()
    }
}

impl ElementExt for SqlToken {
    fn to_element(&self) -> SqlElement {
        self.clone().into()
    }
}

impl ElementExt for SqlNode {
    fn to_element(&self) -> SqlElement {
        self.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::build_statement;

    fn statement(sql: &str) -> SqlNode {
        let tokens: Vec<_> = crate::cst::tokenize(sql).collect();
        build_statement(&tokens)
    }

    fn texts(node: &SqlNode) -> Vec<String> {
        node.tokens().iter().map(ElementExt::value).collect()
    }

    #[test]
    fn test_navigation_skips() {
        let stmt = statement("a /* c */ b");
        let (first, _) = stmt.token_first(true, true).unwrap();
        assert_eq!(first, 0);
        let (next, element) = stmt.token_next(0, true, true).unwrap();
        assert_eq!((next, element.value()), (4, "b".to_string()));
        let (next, element) = stmt.token_next(0, true, false).unwrap();
        assert_eq!((next, element.value()), (2, "/* c */".to_string()));
        let (prev, _) = stmt.token_prev(4, true, true).unwrap();
        assert_eq!(prev, 0);
        assert!(stmt.token_prev(0, false, false).is_none());
        assert!(stmt.token_next(4, false, false).is_none());
    }

    #[test]
    fn test_replace_range_groups_children() {
        let stmt = statement("a + b c");
        let group = stmt.replace_range(NodeKind::Operation, 0, 4, true);
        assert_eq!(group.text().to_string(), "a + b");
        assert_eq!(texts(&stmt), vec!["a + b", " ", "c"]);
        assert_eq!(stmt.text().to_string(), "a + b c");
        assert!(group.is_direct_child_of(&stmt));
        assert_eq!(stmt.token_index(&group.clone().into()), Some(0));
    }

    #[test]
    fn test_extend_range_appends() {
        let stmt = statement("a.b.c");
        stmt.replace_range(NodeKind::Identifier, 0, 3, false);
        let group = stmt.extend_range(0, 2, true);
        assert_eq!(group.text().to_string(), "a.b.c");
        assert_eq!(stmt.child_count(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_replace_range_out_of_bounds_panics() {
        let stmt = statement("a b");
        stmt.replace_range(NodeKind::Identifier, 0, 7, false);
    }

    #[test]
    fn test_group_siblings_and_extend_group() {
        let stmt = statement("a + b + c");
        let children = stmt.tokens();
        let group = group_siblings(NodeKind::Operation, &children[0], &children[4]);
        assert_eq!(group.text().to_string(), "a + b");
        assert_eq!(texts(&stmt), vec!["a + b", " ", "+", " ", "c"]);
        // handles past the run follow the move
        assert_eq!(children[6].index(), 2);

        extend_group(&group, &children[8]);
        assert_eq!(group.text().to_string(), "a + b + c");
        assert_eq!(stmt.child_count(), 1);
        assert_eq!(stmt.text().to_string(), "a + b + c");
    }

    #[test]
    #[should_panic(expected = "not a run of siblings")]
    fn test_group_siblings_backwards_panics() {
        let stmt = statement("a b");
        let children = stmt.tokens();
        group_siblings(NodeKind::Identifier, &children[2], &children[0]);
    }

    #[test]
    fn test_significant_neighbours() {
        let stmt = statement("a  b");
        let children = stmt.tokens();
        assert_eq!(next_significant(&children[0]).unwrap().value(), "b");
        assert_eq!(prev_significant(&children[2]).unwrap().value(), "a");
        assert!(prev_significant(&children[0]).is_none());
        assert!(next_significant(&children[2]).is_none());
    }

    #[test]
    fn test_insert_before_and_after() {
        let stmt = statement("a b");
        stmt.insert_before(0, new_token(TokenType::Whitespace, "  ").into());
        assert_eq!(stmt.text().to_string(), "  a b");
        stmt.insert_after(1, new_token(TokenType::Punctuation, ",").into(), false);
        assert_eq!(stmt.text().to_string(), "  a, b");
        stmt.insert_after(3, new_token(TokenType::Name, "x").into(), true);
        assert_eq!(stmt.text().to_string(), "  a, xb");
        stmt.insert_after(5, new_token(TokenType::Punctuation, ";").into(), true);
        assert_eq!(stmt.text().to_string(), "  a, xb;");
    }

    #[test]
    #[should_panic(expected = "still attached")]
    fn test_insert_attached_element_panics() {
        let stmt = statement("a b");
        let attached = stmt.child(0).unwrap();
        stmt.insert_before(0, attached);
    }

    #[test]
    fn test_replace_token_text() {
        let stmt = statement("select 1");
        let first = stmt.first_token().unwrap();
        let replaced = replace_token_text(&first, "SELECT");
        assert_eq!(stmt.text().to_string(), "SELECT 1");
        assert_eq!(replaced.ttype(), Some(TokenType::KeywordDml));
    }

    #[test]
    fn test_leaf_at_offset() {
        let stmt = statement("select foo");
        assert_eq!(stmt.leaf_at_offset(0).unwrap().text(), "select");
        assert_eq!(stmt.leaf_at_offset(6).unwrap().text(), " ");
        assert_eq!(stmt.leaf_at_offset(9).unwrap().text(), "foo");
        assert!(stmt.leaf_at_offset(10).is_none());
    }

    #[test]
    fn test_element_flags() {
        let stmt = statement("order  by x\n");
        let children = stmt.tokens();
        assert!(children[0].is_keyword());
        assert_eq!(children[0].normalized(), "ORDER BY");
        assert!(children[0].matches(TokenType::Keyword, &["order by"]));
        assert!(!children[0].matches(TokenType::KeywordDml, &[]));
        assert!(children[1].is_whitespace());
        assert!(children[3].is_newline());
        assert!(children[3].is_whitespace());
        assert_eq!(children[2].normalized(), "x");
    }

    #[test]
    fn test_ancestry() {
        let stmt = statement("f(a)");
        let paren = stmt.replace_range(NodeKind::Parenthesis, 1, 3, true);
        let inner = paren.child(1).unwrap();
        assert!(inner.is_within(NodeKind::Parenthesis));
        assert!(inner.is_within(NodeKind::Statement));
        assert!(!inner.is_within(NodeKind::Function));
        assert!(inner.has_ancestor(&stmt));
        assert!(!inner.is_direct_child_of(&stmt));
        assert!(!stmt.has_ancestor(&stmt));
    }

    #[test]
    fn test_flatten_is_restartable() {
        let stmt = statement("a (b) c");
        stmt.replace_range(NodeKind::Parenthesis, 2, 4, true);
        let first: Vec<String> = stmt.flatten().map(|t| t.text().to_string()).collect();
        let second: Vec<String> = stmt.flatten().map(|t| t.text().to_string()).collect();
        assert_eq!(first, vec!["a", " ", "(", "b", ")", " ", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pprint_tree() {
        let stmt = statement("(a)");
        stmt.replace_range(NodeKind::Parenthesis, 0, 2, true);
        assert_eq!(
            stmt.pprint_tree(),
            "Statement\n  Parenthesis\n    Punctuation \"(\"\n    Name \"a\"\n    Punctuation \")\"\n"
        );
    }
}
