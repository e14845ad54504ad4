//! Typed wrappers over grouped nodes
//!
//! Each wrapper implements [`AstNode::cast`] to check the node kind before
//! exposing kind-specific accessors.
//!
//! # Example
//!
//! ```ignore
//! use sqlcst_core::cst::{parse, ast::{AstNode, Statement}};
//!
//! let statements = parse("select a as b from t");
//! let statement = Statement::cast(statements[0].clone()).unwrap();
//! assert_eq!(statement.statement_type(), "SELECT");
//! ```

use rowan::NodeOrToken;

use super::tree::{ElementExt, TokenList};
use super::{NodeKind, SqlElement, SqlNode, SqlSyntaxKind, TokenType};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SqlSyntaxKind) -> bool;
    fn cast(node: SqlNode) -> Option<Self>;
    fn syntax(&self) -> &SqlNode;
}

/// Strip one pair of matching `'`, `"` or `` ` `` quotes
pub fn remove_quotes(text: &str) -> &str {
    for quote in ['\'', '"', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn significant_children(node: &SqlNode) -> Vec<SqlElement> {
    node.tokens()
        .into_iter()
        .filter(|child| !child.is_whitespace())
        .collect()
}

/// First usable name among `elements`
///
/// Plain names, wildcards and quoted symbols count directly (and keywords
/// when `keywords` is set); nested identifiers and functions contribute
/// their real name or their display name.
fn first_name(
    elements: &[SqlElement],
    reverse: bool,
    keywords: bool,
    real_name: bool,
) -> Option<String> {
    let mut ordered: Vec<&SqlElement> = elements.iter().collect();
    if reverse {
        ordered.reverse();
    }
    for element in ordered {
        let ttype = element.ttype();
        let is_name = matches!(
            ttype,
            Some(TokenType::Name | TokenType::Wildcard | TokenType::StringSymbol)
        ) || (keywords && ttype == Some(TokenType::Keyword));
        if is_name {
            return Some(remove_quotes(&element.value()).to_string());
        }
        if let NodeOrToken::Node(node) = element {
            let nested = match node.kind().node_kind() {
                Some(NodeKind::Identifier) => Identifier::cast(node.clone())
                    .and_then(|ident| if real_name { ident.real_name() } else { ident.name() }),
                Some(NodeKind::Function) => Function::cast(node.clone())
                    .and_then(|func| if real_name { func.real_name() } else { func.name() }),
                _ => continue,
            };
            return nested;
        }
    }
    None
}

/// Name and alias lookup shared by identifiers and function calls
pub trait NamedEntity: AstNode {
    /// Name after the last `.`, or the first name when unqualified
    fn real_name(&self) -> Option<String> {
        let children = self.syntax().tokens();
        let start = children
            .iter()
            .rposition(|child| child.is_punct("."))
            .map_or(0, |dot| dot + 1);
        first_name(&children[start..], false, false, true)
    }

    /// Alias from `expr AS alias` or `expr alias`
    fn alias(&self) -> Option<String> {
        let children = self.syntax().tokens();
        if let Some(kw) = children
            .iter()
            .position(|child| child.matches(TokenType::Keyword, &["AS"]))
        {
            return first_name(&children[kw + 1..], false, true, false);
        }
        let has_whitespace = children.iter().any(ElementExt::is_whitespace);
        if children.len() > 2 && has_whitespace {
            return first_name(&children[1..], true, false, false);
        }
        None
    }

    /// Alias when present, real name otherwise
    fn name(&self) -> Option<String> {
        self.alias().or_else(|| self.real_name())
    }

    /// Qualifier before the last `.`
    fn parent_name(&self) -> Option<String> {
        let children = self.syntax().tokens();
        let dot = children.iter().rposition(|child| child.is_punct("."))?;
        children[..dot]
            .iter()
            .rev()
            .find(|child| !child.is_whitespace())
            .map(|prev| remove_quotes(&prev.value()).to_string())
    }
}

// ============================================================================
// Statement
// ============================================================================

/// Root of one SQL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    syntax: SqlNode,
}

impl AstNode for Statement {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Statement)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl Statement {
    /// Upper-cased leading DML or DDL keyword, or `"UNKNOWN"`
    ///
    /// Leading whitespace and comments are skipped. A `WITH` statement takes
    /// the type of the DML keyword after its common table expressions.
    pub fn statement_type(&self) -> String {
        let Some((first_idx, first)) = self.syntax.token_first(true, true) else {
            return "UNKNOWN".to_string();
        };
        match first.ttype() {
            Some(TokenType::KeywordDml | TokenType::KeywordDdl) => first.normalized(),
            Some(TokenType::KeywordCte) => {
                let mut idx = first_idx;
                while let Some((next_idx, next)) = self.syntax.token_next(idx, true, false) {
                    idx = next_idx;
                    if next.is_node(NodeKind::Identifier) || next.is_node(NodeKind::IdentifierList)
                    {
                        if let Some((_, verb)) = self.syntax.token_next(idx, true, false) {
                            if verb.ttype() == Some(TokenType::KeywordDml) {
                                return verb.normalized();
                            }
                        }
                    }
                }
                "UNKNOWN".to_string()
            }
            _ => "UNKNOWN".to_string(),
        }
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// Name, qualified name, aliased expression or typecast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    syntax: SqlNode,
}

impl AstNode for Identifier {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Identifier)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl NamedEntity for Identifier {}

impl Identifier {
    pub fn is_wildcard(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .any(|child| child.ttype() == Some(TokenType::Wildcard))
    }

    /// Type after `::`
    pub fn typecast(&self) -> Option<String> {
        let children = self.syntax.tokens();
        let marker = children
            .iter()
            .position(|child| child.matches(TokenType::Punctuation, &["::"]))?;
        children.get(marker + 1).map(ElementExt::value)
    }

    /// `ASC` or `DESC`
    pub fn ordering(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .find(|child| child.ttype() == Some(TokenType::KeywordOrder))
            .map(|child| child.normalized())
    }

    /// Contents of each `[...]` subscript, brackets excluded
    pub fn array_indices(&self) -> Vec<Vec<SqlElement>> {
        self.syntax
            .children()
            .filter(|child| child.is_node(NodeKind::SquareBrackets))
            .map(|brackets| {
                let inner = brackets.tokens();
                let end = inner.len().saturating_sub(1);
                inner.get(1..end).map(<[_]>::to_vec).unwrap_or_default()
            })
            .collect()
    }
}

// ============================================================================
// IdentifierList
// ============================================================================

/// Comma-separated items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierList {
    syntax: SqlNode,
}

impl AstNode for IdentifierList {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::IdentifierList)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl IdentifierList {
    /// Every entry of the list, without the separating commas and whitespace
    pub fn items(&self) -> Vec<SqlElement> {
        self.syntax
            .children_with_tokens()
            .filter(|child| !child.is_whitespace() && !child.is_punct(","))
            .collect()
    }

    /// Entries that are identifiers or function calls
    ///
    /// Literals, keywords and other expressions in the list are skipped; see
    /// [`items`](Self::items) for all of them.
    pub fn identifiers(&self) -> Vec<SqlElement> {
        self.syntax
            .children_with_tokens()
            .filter(|child| {
                child.is_node(NodeKind::Identifier) || child.is_node(NodeKind::Function)
            })
            .collect()
    }
}

// ============================================================================
// Function
// ============================================================================

/// Function call, with an optional window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    syntax: SqlNode,
}

impl AstNode for Function {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Function)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl NamedEntity for Function {}

impl Function {
    /// Argument list
    pub fn arguments(&self) -> Option<Parenthesis> {
        self.syntax.children().find_map(Parenthesis::cast)
    }

    /// Arguments, one element each
    pub fn parameters(&self) -> Vec<SqlElement> {
        let Some(arguments) = self.arguments() else {
            return Vec::new();
        };
        let mut params = Vec::new();
        for element in arguments.inner() {
            if let NodeOrToken::Node(node) = &element {
                if let Some(list) = IdentifierList::cast(node.clone()) {
                    params.extend(list.items());
                    continue;
                }
            }
            if !(element.is_whitespace()
                || element.is_comment()
                || element.ttype() == Some(TokenType::Punctuation))
            {
                params.push(element);
            }
        }
        params
    }

    /// Window after `OVER`: a parenthesised spec or a window name
    pub fn window(&self) -> Option<SqlElement> {
        let over = self
            .syntax
            .children()
            .find(|child| child.is_node(NodeKind::Over))?;
        significant_children(&over).pop()
    }
}

// ============================================================================
// Parenthesis
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parenthesis {
    syntax: SqlNode,
}

impl AstNode for Parenthesis {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Parenthesis)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl Parenthesis {
    /// Children between the brackets
    pub fn inner(&self) -> Vec<SqlElement> {
        let mut children = self.syntax.tokens();
        if children.last().is_some_and(|last| last.is_punct(")")) {
            children.pop();
        }
        if children.first().is_some_and(|first| first.is_punct("(")) {
            children.remove(0);
        }
        children
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// `a < b`, or a chain such as `a < b < c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    syntax: SqlNode,
}

impl AstNode for Comparison {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Comparison)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl Comparison {
    pub fn left(&self) -> Option<SqlElement> {
        significant_children(&self.syntax).into_iter().next()
    }

    pub fn right(&self) -> Option<SqlElement> {
        significant_children(&self.syntax).pop()
    }

    pub fn operators(&self) -> Vec<SqlElement> {
        self.syntax
            .children_with_tokens()
            .filter(|child| child.ttype() == Some(TokenType::OperatorComparison))
            .collect()
    }

    pub fn operands(&self) -> Vec<SqlElement> {
        significant_children(&self.syntax)
            .into_iter()
            .filter(|child| child.ttype() != Some(TokenType::OperatorComparison))
            .collect()
    }
}

// ============================================================================
// Case
// ============================================================================

/// One `WHEN ... THEN ...` pair, or the `ELSE` branch when `condition` is `None`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseBranch {
    pub condition: Option<Vec<SqlElement>>,
    pub value: Vec<SqlElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    syntax: SqlNode,
}

impl AstNode for Case {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Case)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CaseMode {
    Condition,
    Value,
    Done,
}

impl Case {
    /// Branches in source order
    ///
    /// The `CASE`, `WHEN`, `THEN`, `ELSE` and `END` keywords are not part of
    /// any branch. Elements between `CASE` and the first `WHEN` (the operand
    /// of a simple case) form a leading branch of their own.
    pub fn cases(&self, skip_ws: bool) -> Vec<CaseBranch> {
        let mut branches: Vec<CaseBranch> = Vec::new();
        let mut mode = CaseMode::Condition;

        for token in self.syntax.children_with_tokens() {
            if token.matches(TokenType::Keyword, &["CASE"]) {
                continue;
            }
            if skip_ws && token.is_whitespace() {
                continue;
            }
            if token.matches(TokenType::Keyword, &["WHEN"]) {
                branches.push(CaseBranch {
                    condition: Some(Vec::new()),
                    value: Vec::new(),
                });
                mode = CaseMode::Condition;
                continue;
            }
            if token.matches(TokenType::Keyword, &["THEN"]) {
                mode = CaseMode::Value;
                continue;
            }
            if token.matches(TokenType::Keyword, &["ELSE"]) {
                branches.push(CaseBranch {
                    condition: None,
                    value: Vec::new(),
                });
                mode = CaseMode::Value;
                continue;
            }
            if token.matches(TokenType::Keyword, &["END"]) {
                mode = CaseMode::Done;
                continue;
            }

            if mode != CaseMode::Done && branches.is_empty() {
                branches.push(CaseBranch {
                    condition: Some(Vec::new()),
                    value: Vec::new(),
                });
            }
            let Some(branch) = branches.last_mut() else {
                continue;
            };
            match mode {
                CaseMode::Condition => branch.condition.get_or_insert_with(Vec::new).push(token),
                CaseMode::Value => branch.value.push(token),
                CaseMode::Done => {}
            }
        }
        branches
    }
}

// ============================================================================
// Where / Having
// ============================================================================

/// `WHERE` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Where {
    syntax: SqlNode,
}

impl AstNode for Where {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Where)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl Where {
    /// Everything after the `WHERE` keyword, whitespace skipped
    pub fn conditions(&self) -> Vec<SqlElement> {
        significant_children(&self.syntax).into_iter().skip(1).collect()
    }
}

/// `HAVING` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Having {
    syntax: SqlNode,
}

impl AstNode for Having {
    fn can_cast(kind: SqlSyntaxKind) -> bool {
        kind == SqlSyntaxKind::Node(NodeKind::Having)
    }

    fn cast(node: SqlNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SqlNode {
        &self.syntax
    }
}

impl Having {
    pub fn conditions(&self) -> Vec<SqlElement> {
        significant_children(&self.syntax).into_iter().skip(1).collect()
    }
}
