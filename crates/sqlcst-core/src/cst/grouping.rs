//! Grouping engine
//!
//! [`group`] rewrites a flat statement into nested nodes, in place. Passes run
//! in a fixed order and each one finishes its whole traversal before the next
//! starts:
//!
//! 1. comment runs, matched brackets and blocks, typed literals
//! 2. functions, dotted names, array subscripts, identifiers, typecasts,
//!    arithmetic operations
//! 3. comparisons and assignments
//! 4. `OVER`, `WHERE` and `HAVING` clauses
//! 5. `ASC`/`DESC` ordering suffixes
//! 6. aliases, comma lists, `VALUES`, backslash commands
//!
//! Every pass only moves contiguous child ranges into new nodes. Leaves are
//! never created, dropped, retyped or reordered, and grouping cannot fail.
//!
//! Passes walk siblings with cursors rather than re-reading the child list
//! after each change. A chain such as `a + b + c` or `x, y, z` is gathered in
//! one scan and moved into its node in a single step.

use super::matching::{BRACKET_KINDS, KindMatcher, matcher};
use super::tree::{
    ElementExt, TokenList, extend_group, group_siblings, next_significant, prev_significant,
};
use super::{NodeKind, SqlElement, SqlNode, TokenType};

/// Group `statement` in place
pub fn group(statement: &SqlNode) {
    tracing::trace!(len = statement.child_count(), "Grouping statement");

    group_comments(statement);
    for kind in BRACKET_KINDS {
        if let Some(rules) = matcher(kind) {
            group_matching(statement, kind, rules);
        }
    }
    group_typed_literals(statement);

    group_functions(statement);
    group_binary(statement, &PERIOD);
    group_binary(statement, &ARRAYS);
    group_identifiers(statement);
    group_binary(statement, &TYPECASTS);
    group_binary(statement, &OPERATIONS);

    group_binary(statement, &COMPARISONS);
    group_binary(statement, &ASSIGNMENTS);

    group_over(statement);
    group_clause(statement, NodeKind::Where);
    group_clause(statement, NodeKind::Having);

    group_order(statement);

    group_binary(statement, &ALIASES);
    group_aliased(statement);
    group_binary(statement, &IDENTIFIER_LISTS);
    group_values(statement);
    group_commands(statement);
}

/// Apply `f` to every node below `tlist` bottom-up, then to `tlist` itself
///
/// Nodes whose kind is in `stop` are neither visited nor descended into.
pub fn recurse_bottom_up(tlist: &SqlNode, stop: &[NodeKind], f: &dyn Fn(&SqlNode)) {
    let mut child = tlist.first_child();
    while let Some(node) = child {
        match node.kind().node_kind() {
            Some(kind) if stop.contains(&kind) => {}
            _ => recurse_bottom_up(&node, stop, f),
        }
        child = node.next_sibling();
    }
    f(tlist);
}

/// Group `from..=to`, extending an existing node of `kind` at `from` when asked
fn group_span(kind: NodeKind, from: &SqlElement, to: &SqlElement, extend: bool) -> SqlNode {
    match from {
        SqlElement::Node(node) if extend && node.is_node(kind) => {
            if node.index() == to.index() {
                node.clone()
            } else {
                extend_group(node, to)
            }
        }
        _ => group_siblings(kind, from, to),
    }
}

/// The child of `tlist` that is `element` or contains it
fn child_of(tlist: &SqlNode, element: &SqlElement) -> SqlElement {
    let mut current = element.clone();
    while let Some(parent) = current.parent() {
        if &parent == tlist {
            break;
        }
        current = parent.into();
    }
    current
}

fn is_exact(element: &SqlElement, types: &[TokenType]) -> bool {
    element.ttype().is_some_and(|ttype| types.contains(&ttype))
}

fn is_node_in(element: &SqlElement, kinds: &[NodeKind]) -> bool {
    element.node_kind().is_some_and(|kind| kinds.contains(&kind))
}

const NUMERIC_TYPES: [TokenType; 3] = [
    TokenType::Number,
    TokenType::NumberInteger,
    TokenType::NumberFloat,
];

const OPERAND_TYPES: [TokenType; 8] = [
    TokenType::Number,
    TokenType::NumberInteger,
    TokenType::NumberFloat,
    TokenType::String,
    TokenType::StringSingle,
    TokenType::StringSymbol,
    TokenType::Name,
    TokenType::NamePlaceholder,
];

// --- pass 1: comments, brackets, typed literals -----------------------------

fn group_comments(statement: &SqlNode) {
    recurse_bottom_up(statement, &[NodeKind::Comment], &|tlist| {
        let mut cursor = tlist.first_child_or_token();
        while let Some(start) = cursor {
            if !start.is_a(TokenType::Comment) {
                cursor = start.next_sibling_or_token();
                continue;
            }
            let mut last = start.clone();
            let mut after = start.next_sibling_or_token();
            while let Some(element) =
                after.take_if(|element| element.is_a(TokenType::Comment) || element.is_newline())
            {
                after = element.next_sibling_or_token();
                last = element;
            }
            // a comment run is grouped only when something follows it
            if after.is_some() {
                group_siblings(NodeKind::Comment, &start, &last);
            }
            cursor = after;
        }
    });
}

fn group_matching(tlist: &SqlNode, kind: NodeKind, rules: &KindMatcher) {
    let mut opens: Vec<SqlElement> = Vec::new();
    let mut cursor = tlist.first_child_or_token();
    while let Some(token) = cursor {
        cursor = token.next_sibling_or_token();
        if token.is_whitespace() {
            continue;
        }
        if let SqlElement::Node(node) = &token
            && !node.is_node(kind)
        {
            group_matching(node, kind, rules);
            continue;
        }
        if rules.opens(&token) {
            opens.push(token);
        } else if rules.closes(&token)
            && let Some(open) = opens.pop()
        {
            group_siblings(kind, &open, &token);
        }
    }
}

fn group_typed_literals(statement: &SqlNode) {
    group_binary(statement, &TYPED_LITERALS);
    group_binary(statement, &TYPED_LITERAL_UNITS);
}

// --- generic binary grouping -------------------------------------------------

/// First and last sibling of a run to group
type Span = (SqlElement, SqlElement);

/// Rule for grouping a matched token with its neighbours
struct BinaryRule {
    kind: NodeKind,
    is_match: fn(&SqlElement) -> bool,
    valid_prev: fn(Option<&SqlElement>) -> bool,
    valid_next: fn(Option<&SqlElement>) -> bool,
    /// Picks the first and last element to group from `(prev, matched, next)`
    post: fn(Option<&SqlElement>, &SqlElement, Option<&SqlElement>) -> Option<Span>,
    extend: bool,
}

/// Group every matching token of `tlist` and its descendants per `rule`
///
/// After a span is grouped, the last element it absorbed stays the "previous"
/// element, so a chain such as `a < b < c` extends one node instead of
/// nesting. Spans of an extending rule are collected until the chain breaks
/// and only then moved.
fn group_binary(tlist: &SqlNode, rule: &BinaryRule) {
    let mut child = tlist.first_child();
    while let Some(node) = child {
        if !node.is_node(rule.kind) {
            group_binary(&node, rule);
        }
        child = node.next_sibling();
    }

    let mut pending: Option<Span> = None;
    let mut prev: Option<SqlElement> = None;
    let mut cursor = tlist.first_child_or_token();
    while let Some(token) = cursor {
        cursor = token.next_sibling_or_token();
        if token.is_whitespace() {
            continue;
        }

        if (rule.is_match)(&token) {
            let next = next_significant(&token);
            if (rule.valid_prev)(prev.as_ref())
                && (rule.valid_next)(next.as_ref())
                && let Some((from, to)) = (rule.post)(prev.as_ref(), &token, next.as_ref())
            {
                cursor = to.next_sibling_or_token();
                if rule.extend {
                    pending = Some(match pending.take() {
                        Some((start, end)) if end.index() == from.index() => (start, to.clone()),
                        Some((start, end)) => {
                            group_span(rule.kind, &start, &end, true);
                            (from, to.clone())
                        }
                        None => (from, to.clone()),
                    });
                } else {
                    group_siblings(rule.kind, &child_of(tlist, &from), &to);
                }
                prev = Some(to);
                continue;
            }
        }

        prev = Some(token);
    }

    if let Some((start, end)) = pending {
        group_span(rule.kind, &start, &end, true);
    }
}

fn any_prev(prev: Option<&SqlElement>) -> bool {
    prev.is_some()
}

fn always(_: Option<&SqlElement>) -> bool {
    true
}

fn prev_to_next(
    prev: Option<&SqlElement>,
    _: &SqlElement,
    next: Option<&SqlElement>,
) -> Option<Span> {
    Some((prev?.clone(), next?.clone()))
}

fn prev_to_match(
    prev: Option<&SqlElement>,
    token: &SqlElement,
    _: Option<&SqlElement>,
) -> Option<Span> {
    Some((prev?.clone(), token.clone()))
}

fn match_to_next(
    _: Option<&SqlElement>,
    token: &SqlElement,
    next: Option<&SqlElement>,
) -> Option<Span> {
    Some((token.clone(), next?.clone()))
}

static TYPED_LITERALS: BinaryRule = BinaryRule {
    kind: NodeKind::TypedLiteral,
    is_match: |token| matcher(NodeKind::TypedLiteral).is_some_and(|rules| rules.opens(token)),
    valid_prev: always,
    valid_next: |next| {
        next.is_some_and(|token| {
            matcher(NodeKind::TypedLiteral).is_some_and(|rules| rules.closes(token))
        })
    },
    post: match_to_next,
    extend: false,
};

static TYPED_LITERAL_UNITS: BinaryRule = BinaryRule {
    kind: NodeKind::TypedLiteral,
    is_match: |token| token.is_node(NodeKind::TypedLiteral),
    valid_prev: always,
    valid_next: |next| {
        next.is_some_and(|token| {
            matcher(NodeKind::TypedLiteral).is_some_and(|rules| rules.extends(token))
        })
    },
    post: match_to_next,
    extend: true,
};

// --- pass 2: functions, names, operations -----------------------------------

fn group_functions(statement: &SqlNode) {
    recurse_bottom_up(statement, &[NodeKind::Function], &group_functions_in);
}

fn group_functions_in(tlist: &SqlNode) {
    let has_keyword = |words: &[&str]| {
        tlist
            .children_with_tokens()
            .any(|child| child.is_keyword_in(words))
    };
    // column definitions of CREATE TABLE look like calls
    if has_keyword(&["CREATE", "CREATE OR REPLACE"])
        && has_keyword(&["TABLE"])
        && !has_keyword(&["AS"])
    {
        return;
    }

    let mut cursor = tlist.first_child_or_token();
    while let Some(token) = cursor {
        cursor = token.next_sibling_or_token();
        if !token.is_a(TokenType::Name) {
            continue;
        }
        let Some(arguments) =
            next_significant(&token).filter(|next| next.is_node(NodeKind::Parenthesis))
        else {
            continue;
        };

        let mut end = arguments.clone();
        if let Some(over) = next_significant(&arguments)
            .filter(|next| next.matches(TokenType::Keyword, &["OVER"]))
            && let Some(window) = next_significant(&over).filter(|next| {
                next.is_node(NodeKind::Parenthesis) || next.ttype() == Some(TokenType::Name)
            })
        {
            end = group_siblings(NodeKind::Over, &over, &window).into();
        }
        let function = group_siblings(NodeKind::Function, &token, &end);
        cursor = function.next_sibling_or_token();
    }
}

static PERIOD: BinaryRule = BinaryRule {
    kind: NodeKind::Identifier,
    is_match: |token| {
        token.matches(TokenType::Punctuation, &["."])
            || token.matches(TokenType::Operator, &["->", "->>"])
    },
    valid_prev: |prev| {
        prev.is_some_and(|token| {
            is_node_in(token, &[NodeKind::SquareBrackets, NodeKind::Identifier])
                || is_exact(token, &[TokenType::Name, TokenType::StringSymbol])
        })
    },
    valid_next: always,
    // `a.` without a usable right side still groups the dot
    post: |prev, token, next| {
        let prev = prev?;
        let right = next.filter(|next| {
            is_node_in(next, &[NodeKind::SquareBrackets, NodeKind::Function])
                || is_exact(
                    next,
                    &[
                        TokenType::Name,
                        TokenType::StringSymbol,
                        TokenType::Wildcard,
                        TokenType::StringSingle,
                    ],
                )
        });
        Some((prev.clone(), right.unwrap_or(token).clone()))
    },
    extend: true,
};

static ARRAYS: BinaryRule = BinaryRule {
    kind: NodeKind::Identifier,
    is_match: |token| token.is_node(NodeKind::SquareBrackets),
    valid_prev: |prev| {
        prev.is_some_and(|token| {
            is_node_in(
                token,
                &[
                    NodeKind::SquareBrackets,
                    NodeKind::Identifier,
                    NodeKind::Function,
                ],
            ) || is_exact(token, &[TokenType::Name, TokenType::StringSymbol])
        })
    },
    valid_next: always,
    post: prev_to_match,
    extend: true,
};

fn group_identifiers(statement: &SqlNode) {
    recurse_bottom_up(statement, &[NodeKind::Identifier], &|tlist| {
        let mut cursor = tlist.first_child_or_token();
        while let Some(token) = cursor {
            cursor = token.next_sibling_or_token();
            if is_exact(&token, &[TokenType::Name, TokenType::StringSymbol]) {
                group_siblings(NodeKind::Identifier, &token, &token);
            }
        }
    });
}

static TYPECASTS: BinaryRule = BinaryRule {
    kind: NodeKind::Identifier,
    is_match: |token| token.matches(TokenType::Punctuation, &["::"]),
    valid_prev: any_prev,
    valid_next: any_prev,
    post: prev_to_next,
    extend: true,
};

fn is_operand(token: &SqlElement) -> bool {
    is_node_in(
        token,
        &[
            NodeKind::SquareBrackets,
            NodeKind::Parenthesis,
            NodeKind::Function,
            NodeKind::Identifier,
            NodeKind::Operation,
            NodeKind::TypedLiteral,
        ],
    ) || is_exact(token, &OPERAND_TYPES)
        || token.matches(
            TokenType::Keyword,
            &["CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP"],
        )
}

static OPERATIONS: BinaryRule = BinaryRule {
    kind: NodeKind::Operation,
    is_match: |token| is_exact(token, &[TokenType::Operator, TokenType::Wildcard]),
    valid_prev: |prev| prev.is_some_and(is_operand),
    valid_next: |next| next.is_some_and(is_operand),
    post: prev_to_next,
    extend: true,
};

// --- pass 3: comparisons, assignments ---------------------------------------

fn is_comparable(token: &SqlElement) -> bool {
    is_node_in(
        token,
        &[
            NodeKind::Parenthesis,
            NodeKind::Function,
            NodeKind::Identifier,
            NodeKind::Operation,
            NodeKind::TypedLiteral,
        ],
    ) || is_exact(token, &OPERAND_TYPES)
        || token.is_keyword_in(&["NULL"])
}

static COMPARISONS: BinaryRule = BinaryRule {
    kind: NodeKind::Comparison,
    is_match: |token| token.ttype() == Some(TokenType::OperatorComparison),
    valid_prev: |prev| prev.is_some_and(is_comparable),
    valid_next: |next| next.is_some_and(is_comparable),
    post: prev_to_next,
    extend: true,
};

static ASSIGNMENTS: BinaryRule = BinaryRule {
    kind: NodeKind::Assignment,
    is_match: |token| token.matches(TokenType::Assignment, &[":="]),
    valid_prev: |prev| prev.is_some_and(|token| token.ttype() != Some(TokenType::Keyword)),
    valid_next: |next| next.is_some_and(|token| token.ttype() != Some(TokenType::Keyword)),
    post: prev_to_next,
    extend: true,
};

// --- pass 4: keyword clauses ------------------------------------------------

fn group_over(statement: &SqlNode) {
    recurse_bottom_up(statement, &[NodeKind::Over], &|tlist| {
        let Some(rules) = matcher(NodeKind::Over) else {
            return;
        };
        let mut cursor = tlist.first_child_or_token();
        while let Some(token) = cursor {
            cursor = token.next_sibling_or_token();
            if !rules.opens(&token) {
                continue;
            }
            let window = next_significant(&token).filter(|next| {
                is_node_in(next, &[NodeKind::Parenthesis, NodeKind::Identifier])
                    || next.ttype() == Some(TokenType::Name)
            });
            if let Some(window) = window {
                cursor = window.next_sibling_or_token();
                group_siblings(NodeKind::Over, &token, &window);
            }
        }
    });
}

/// Closing bracket of the enclosing list, which no clause may absorb
fn clause_limit(tlist: &SqlNode) -> Option<SqlElement> {
    let closing = match tlist.kind().node_kind() {
        Some(NodeKind::Parenthesis) => ")",
        Some(NodeKind::SquareBrackets) => "]",
        _ => return None,
    };
    tlist
        .last_child_or_token()
        .filter(|last| last.is_punct(closing))
}

fn group_clause(statement: &SqlNode, kind: NodeKind) {
    let Some(rules) = matcher(kind) else {
        return;
    };
    recurse_bottom_up(statement, &[kind], &|tlist| {
        let limit = clause_limit(tlist);
        let is_limit =
            |element: &SqlElement| limit.as_ref().is_some_and(|limit| limit.index() == element.index());

        let mut cursor = tlist.first_child_or_token();
        while let Some(token) = cursor {
            if is_limit(&token) {
                break;
            }
            cursor = token.next_sibling_or_token();
            if !rules.opens(&token) {
                continue;
            }
            let mut last = token.clone();
            let mut after = token.next_sibling_or_token();
            while let Some(element) = after.take_if(|element| {
                let element = &*element;
                !(is_limit(element) || rules.closes(element) || element.is_punct(";"))
            }) {
                after = element.next_sibling_or_token();
                last = element;
            }
            group_siblings(kind, &token, &last);
            cursor = after;
        }
    });
}

// --- pass 5: ordering suffixes ----------------------------------------------

fn group_order(statement: &SqlNode) {
    recurse_bottom_up(statement, &[NodeKind::Identifier], &|tlist| {
        let mut cursor = tlist.first_child_or_token();
        while let Some(token) = cursor {
            cursor = token.next_sibling_or_token();
            if token.ttype() != Some(TokenType::KeywordOrder) {
                continue;
            }
            let Some(prev) = prev_significant(&token) else {
                continue;
            };
            match &prev {
                SqlElement::Node(node) if node.is_node(NodeKind::Identifier) => {
                    extend_group(node, &token);
                }
                _ if is_exact(&prev, &[TokenType::Name, TokenType::StringSymbol])
                    || is_exact(&prev, &NUMERIC_TYPES) =>
                {
                    group_siblings(NodeKind::Identifier, &prev, &token);
                }
                _ => {}
            }
        }
    });
}

// --- pass 6: aliases, lists, values, commands -------------------------------

static ALIASES: BinaryRule = BinaryRule {
    kind: NodeKind::Identifier,
    is_match: |token| token.is_keyword_in(&["AS"]),
    valid_prev: |prev| {
        prev.is_some_and(|token| token.is_keyword_in(&["NULL"]) || !token.is_keyword())
    },
    valid_next: |next| {
        next.is_some_and(|token| {
            !is_exact(
                token,
                &[
                    TokenType::KeywordDml,
                    TokenType::KeywordDdl,
                    TokenType::KeywordCte,
                ],
            )
        })
    },
    post: prev_to_next,
    extend: true,
};

fn group_aliased(statement: &SqlNode) {
    const ALIASABLE: [NodeKind; 6] = [
        NodeKind::Parenthesis,
        NodeKind::Function,
        NodeKind::Case,
        NodeKind::Identifier,
        NodeKind::Operation,
        NodeKind::Comparison,
    ];
    recurse_bottom_up(statement, &[NodeKind::Identifier], &|tlist| {
        let mut cursor = tlist.first_child_or_token();
        while let Some(token) = cursor {
            cursor = token.next_sibling_or_token();
            if !(is_node_in(&token, &ALIASABLE) || token.is_a(TokenType::Number)) {
                continue;
            }
            if let Some(alias) =
                next_significant(&token).filter(|next| next.is_node(NodeKind::Identifier))
            {
                cursor = alias.next_sibling_or_token();
                group_span(NodeKind::Identifier, &token, &alias, true);
            }
        }
    });
}

fn is_list_item(token: &SqlElement) -> bool {
    is_node_in(
        token,
        &[
            NodeKind::Function,
            NodeKind::Case,
            NodeKind::Identifier,
            NodeKind::Comparison,
            NodeKind::IdentifierList,
            NodeKind::Operation,
            NodeKind::TypedLiteral,
        ],
    ) || is_exact(token, &OPERAND_TYPES)
        || is_exact(token, &[TokenType::Keyword, TokenType::Wildcard])
}

static IDENTIFIER_LISTS: BinaryRule = BinaryRule {
    kind: NodeKind::IdentifierList,
    is_match: |token| token.matches(TokenType::Punctuation, &[","]),
    valid_prev: |prev| prev.is_some_and(is_list_item),
    valid_next: |next| next.is_some_and(is_list_item),
    post: prev_to_next,
    extend: true,
};

fn group_values(statement: &SqlNode) {
    let mut keyword: Option<SqlElement> = None;
    let mut last_tuple: Option<SqlElement> = None;
    for child in statement.children_with_tokens() {
        if keyword.is_none() {
            if child.matches(TokenType::Keyword, &["VALUES"]) {
                keyword = Some(child);
            }
        } else if child.is_node(NodeKind::Parenthesis) {
            last_tuple = Some(child);
        }
    }
    if let (Some(keyword), Some(last_tuple)) = (keyword, last_tuple) {
        group_siblings(NodeKind::Values, &keyword, &last_tuple);
    }
}

fn group_commands(statement: &SqlNode) {
    let mut cursor = statement.first_child_or_token();
    while let Some(start) = cursor {
        if !start.matches(TokenType::Error, &["\\"]) {
            cursor = start.next_sibling_or_token();
            continue;
        }
        let mut end = start.clone();
        let mut after = start.next_sibling_or_token();
        while let Some(element) = after.take_if(|element| !element.is_newline()) {
            after = element.next_sibling_or_token();
            end = element;
        }
        group_siblings(NodeKind::Command, &start, &end);
        cursor = after;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{build_statement, tokenize};

    fn grouped(sql: &str) -> SqlNode {
        let tokens: Vec<_> = tokenize(sql).collect();
        let statement = build_statement(&tokens);
        group(&statement);
        statement
    }

    fn kinds(node: &SqlNode) -> Vec<String> {
        node.tokens()
            .iter()
            .filter(|child| !child.is_whitespace())
            .map(|child| match child.node_kind() {
                Some(kind) => kind.to_string(),
                None => child.value(),
            })
            .collect()
    }

    fn child_node(node: &SqlNode, idx: usize) -> SqlNode {
        node.children().nth(idx).unwrap()
    }

    #[test]
    fn test_nested_parenthesis() {
        let stmt = grouped("(a (b) c)");
        assert_eq!(kinds(&stmt), vec!["Parenthesis"]);
        let outer = child_node(&stmt, 0);
        let nested: Vec<SqlNode> = outer
            .descendants()
            .skip(1)
            .filter(|child| child.is_node(NodeKind::Parenthesis))
            .collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].text().to_string(), "(b)");
    }

    #[test]
    fn test_unmatched_open_stays_flat() {
        let stmt = grouped("SELECT (1, 2");
        assert_eq!(stmt.text().to_string(), "SELECT (1, 2");
        assert!(stmt.children().all(|child| !child.is_node(NodeKind::Parenthesis)));
    }

    #[test]
    fn test_comparison_chain_is_flat() {
        let stmt = grouped("a < b < c");
        assert_eq!(kinds(&stmt), vec!["Comparison"]);
        let comparison = child_node(&stmt, 0);
        assert_eq!(
            kinds(&comparison),
            vec!["Identifier", "<", "Identifier", "<", "Identifier"]
        );
    }

    #[test]
    fn test_case_block() {
        let stmt = grouped("CASE WHEN a THEN 1 ELSE 0 END");
        assert_eq!(kinds(&stmt), vec!["Case"]);
    }

    #[test]
    fn test_select_shape() {
        let stmt = grouped("select a, b as c from t where x = 1 order by a desc;");
        assert_eq!(
            kinds(&stmt),
            vec![
                "select",
                "IdentifierList",
                "from",
                "Identifier",
                "Where",
                "order by",
                "Identifier",
                ";"
            ]
        );
        let where_clause = child_node(&stmt, 2);
        assert_eq!(where_clause.text().to_string(), "where x = 1 ");
        assert_eq!(kinds(&where_clause), vec!["where", "Comparison"]);
    }

    #[test]
    fn test_where_stops_at_closing_paren() {
        let stmt = grouped("select * from (select a from t where b = 1) s");
        let aliased = stmt
            .children()
            .find(|child| child.is_node(NodeKind::Identifier))
            .unwrap();
        assert_eq!(aliased.text().to_string(), "(select a from t where b = 1) s");
        let paren = child_node(&aliased, 0);
        assert!(paren.is_node(NodeKind::Parenthesis));
        let where_clause = paren
            .children()
            .find(|child| child.is_node(NodeKind::Where))
            .unwrap();
        assert_eq!(where_clause.text().to_string(), "where b = 1");
    }

    #[test]
    fn test_having_clause() {
        let stmt = grouped("select a from t group by a having count(*) > 1 order by a");
        let having = stmt
            .children()
            .find(|child| child.is_node(NodeKind::Having))
            .unwrap();
        assert_eq!(having.text().to_string(), "having count(*) > 1 ");
    }

    #[test]
    fn test_function_with_window() {
        let stmt = grouped("select row_number() over (partition by a) from t");
        let function = stmt
            .children()
            .find(|child| child.is_node(NodeKind::Function))
            .unwrap();
        assert_eq!(
            function.text().to_string(),
            "row_number() over (partition by a)"
        );
        assert_eq!(kinds(&function), vec!["Identifier", "Parenthesis", "Over"]);
    }

    #[test]
    fn test_create_table_columns_are_not_functions() {
        let stmt = grouped("create table t (id int)");
        assert!(stmt.children().all(|child| !child.is_node(NodeKind::Function)));
    }

    #[test]
    fn test_dotted_names_and_typecast() {
        let stmt = grouped("select s.t.col::text");
        let identifier = child_node(&stmt, 0);
        assert!(identifier.is_node(NodeKind::Identifier));
        assert_eq!(identifier.text().to_string(), "s.t.col::text");
    }

    #[test]
    fn test_operation_is_flat() {
        let stmt = grouped("select a + b * 2");
        let operation = child_node(&stmt, 0);
        assert!(operation.is_node(NodeKind::Operation));
        assert_eq!(
            kinds(&operation),
            vec!["Identifier", "+", "Identifier", "*", "2"]
        );
    }

    #[test]
    fn test_typed_literal() {
        let stmt = grouped("select interval '2' day");
        let literal = child_node(&stmt, 0);
        assert!(literal.is_node(NodeKind::TypedLiteral));
        assert_eq!(literal.text().to_string(), "interval '2' day");
    }

    #[test]
    fn test_assignment() {
        let stmt = grouped("x := 1");
        assert_eq!(kinds(&stmt), vec!["Assignment"]);
    }

    #[test]
    fn test_values() {
        let stmt = grouped("insert into t values (1, 2), (3, 4);");
        assert_eq!(
            kinds(&stmt),
            vec!["insert", "into", "Identifier", "Values", ";"]
        );
    }

    #[test]
    fn test_leading_comment_is_grouped() {
        let stmt = grouped("-- note\n/* more */\nselect 1");
        assert_eq!(kinds(&stmt), vec!["Comment", "select", "1"]);
    }

    #[test]
    fn test_command_line() {
        let stmt = grouped("\\copy t to 'f'\nselect 1");
        let command = child_node(&stmt, 0);
        assert!(command.is_node(NodeKind::Command));
        assert_eq!(command.text().to_string(), "\\copy t to 'f'");
    }

    #[test]
    fn test_begin_block() {
        let stmt = grouped("BEGIN x := 1; END");
        assert_eq!(kinds(&stmt), vec!["Begin"]);
    }

    #[test]
    fn test_grouping_preserves_leaves() {
        let sql = "select a.b, count(*) over w from t where x in (1, 2) and y::int >= 3 -- c\n;";
        let before: Vec<(TokenType, &str)> = tokenize(sql).collect();
        let stmt = grouped(sql);
        let after: Vec<(TokenType, String)> = stmt
            .flatten()
            .map(|token| (token.ttype().unwrap(), token.text().to_string()))
            .collect();
        let before: Vec<(TokenType, String)> = before
            .into_iter()
            .map(|(ttype, text)| (ttype, text.to_string()))
            .collect();
        assert_eq!(before, after);
    }
}
