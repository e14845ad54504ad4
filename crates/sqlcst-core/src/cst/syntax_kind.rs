//! Token-type taxonomy and composite node kinds
//!
//! Leaf tokens carry a [`TokenType`]: a tag in a small tree of categories
//! (`Keyword.DML` is a `Keyword`, `Newline` is a `Whitespace`, ...).
//! Membership tests walk the parent chain, so they cost O(depth).
//!
//! Composite nodes carry a [`NodeKind`]. Both are folded into
//! [`SqlSyntaxKind`], which is what rowan stores for every element.

use std::fmt;

/// Type tag of a leaf token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum TokenType {
    Text = 0,
    Whitespace = 1,
    Newline = 2,
    Comment = 3,
    CommentSingle = 4,
    CommentMultiline = 5,
    Literal = 6,
    String = 7,
    StringSingle = 8,
    StringSymbol = 9,
    Number = 10,
    NumberInteger = 11,
    NumberFloat = 12,
    Name = 13,
    NamePlaceholder = 14,
    NameBuiltin = 15,
    Keyword = 16,
    KeywordDml = 17,
    KeywordDdl = 18,
    KeywordCte = 19,
    KeywordOrder = 20,
    Operator = 21,
    OperatorComparison = 22,
    Assignment = 23,
    Punctuation = 24,
    Wildcard = 25,
    Error = 26,
}

impl TokenType {
    /// Every tag, indexed by its discriminant
    pub const ALL: [TokenType; 27] = [
        TokenType::Text,
        TokenType::Whitespace,
        TokenType::Newline,
        TokenType::Comment,
        TokenType::CommentSingle,
        TokenType::CommentMultiline,
        TokenType::Literal,
        TokenType::String,
        TokenType::StringSingle,
        TokenType::StringSymbol,
        TokenType::Number,
        TokenType::NumberInteger,
        TokenType::NumberFloat,
        TokenType::Name,
        TokenType::NamePlaceholder,
        TokenType::NameBuiltin,
        TokenType::Keyword,
        TokenType::KeywordDml,
        TokenType::KeywordDdl,
        TokenType::KeywordCte,
        TokenType::KeywordOrder,
        TokenType::Operator,
        TokenType::OperatorComparison,
        TokenType::Assignment,
        TokenType::Punctuation,
        TokenType::Wildcard,
        TokenType::Error,
    ];

    /// Parent category, `None` for the root `Text` tag
    pub fn parent(self) -> Option<TokenType> {
        use TokenType::*;
        match self {
            Text => None,
            Newline => Some(Whitespace),
            CommentSingle | CommentMultiline => Some(Comment),
            String | Number => Some(Literal),
            StringSingle | StringSymbol => Some(String),
            NumberInteger | NumberFloat => Some(Number),
            NamePlaceholder | NameBuiltin => Some(Name),
            KeywordDml | KeywordDdl | KeywordCte | KeywordOrder => Some(Keyword),
            OperatorComparison => Some(Operator),
            Whitespace | Comment | Literal | Name | Keyword | Operator | Assignment
            | Punctuation | Wildcard | Error => Some(Text),
        }
    }

    /// Returns `true` if `category` is this tag or one of its ancestors
    pub fn is_a(self, category: TokenType) -> bool {
        let mut current = Some(self);
        while let Some(ttype) = current {
            if ttype == category {
                return true;
            }
            current = ttype.parent();
        }
        false
    }

    /// Returns `true` if this tag falls in any of the given categories
    pub fn is_any(self, categories: &[TokenType]) -> bool {
        categories.iter().any(|&category| self.is_a(category))
    }

    /// Dotted display name, e.g. `Keyword.DML`
    pub fn name(self) -> &'static str {
        use TokenType::*;
        match self {
            Text => "Text",
            Whitespace => "Whitespace",
            Newline => "Newline",
            Comment => "Comment",
            CommentSingle => "Comment.Single",
            CommentMultiline => "Comment.Multiline",
            Literal => "Literal",
            String => "String",
            StringSingle => "String.Single",
            StringSymbol => "String.Symbol",
            Number => "Number",
            NumberInteger => "Number.Integer",
            NumberFloat => "Number.Float",
            Name => "Name",
            NamePlaceholder => "Name.Placeholder",
            NameBuiltin => "Name.Builtin",
            Keyword => "Keyword",
            KeywordDml => "Keyword.DML",
            KeywordDdl => "Keyword.DDL",
            KeywordCte => "Keyword.CTE",
            KeywordOrder => "Keyword.Order",
            Operator => "Operator",
            OperatorComparison => "Operator.Comparison",
            Assignment => "Assignment",
            Punctuation => "Punctuation",
            Wildcard => "Wildcard",
            Error => "Error",
        }
    }

    fn from_raw(raw: u16) -> Option<TokenType> {
        Self::ALL.get(usize::from(raw)).copied()
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a composite node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum NodeKind {
    Statement = 256,
    Parenthesis = 257,
    SquareBrackets = 258,
    Identifier = 259,
    IdentifierList = 260,
    Function = 261,
    Case = 262,
    If = 263,
    For = 264,
    Begin = 265,
    Where = 266,
    Having = 267,
    Over = 268,
    Comparison = 269,
    Assignment = 270,
    Operation = 271,
    Values = 272,
    Command = 273,
    TypedLiteral = 274,
    Comment = 275,
}

impl NodeKind {
    const BASE: u16 = 256;

    pub const ALL: [NodeKind; 20] = [
        NodeKind::Statement,
        NodeKind::Parenthesis,
        NodeKind::SquareBrackets,
        NodeKind::Identifier,
        NodeKind::IdentifierList,
        NodeKind::Function,
        NodeKind::Case,
        NodeKind::If,
        NodeKind::For,
        NodeKind::Begin,
        NodeKind::Where,
        NodeKind::Having,
        NodeKind::Over,
        NodeKind::Comparison,
        NodeKind::Assignment,
        NodeKind::Operation,
        NodeKind::Values,
        NodeKind::Command,
        NodeKind::TypedLiteral,
        NodeKind::Comment,
    ];

    fn from_raw(raw: u16) -> Option<NodeKind> {
        raw.checked_sub(Self::BASE)
            .and_then(|index| Self::ALL.get(usize::from(index)).copied())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Kind stored by rowan for every element of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SqlSyntaxKind {
    Token(TokenType),
    Node(NodeKind),
}

impl SqlSyntaxKind {
    pub fn to_raw(self) -> u16 {
        match self {
            SqlSyntaxKind::Token(ttype) => ttype as u16,
            SqlSyntaxKind::Node(kind) => kind as u16,
        }
    }

    /// Decode a raw rowan kind, falling back to `Error` for unknown values
    pub fn from_raw(raw: u16) -> SqlSyntaxKind {
        if let Some(kind) = NodeKind::from_raw(raw) {
            return SqlSyntaxKind::Node(kind);
        }
        SqlSyntaxKind::Token(TokenType::from_raw(raw).unwrap_or(TokenType::Error))
    }

    pub fn token_type(self) -> Option<TokenType> {
        match self {
            SqlSyntaxKind::Token(ttype) => Some(ttype),
            SqlSyntaxKind::Node(_) => None,
        }
    }

    pub fn node_kind(self) -> Option<NodeKind> {
        match self {
            SqlSyntaxKind::Node(kind) => Some(kind),
            SqlSyntaxKind::Token(_) => None,
        }
    }
}

impl From<TokenType> for SqlSyntaxKind {
    fn from(ttype: TokenType) -> Self {
        SqlSyntaxKind::Token(ttype)
    }
}

impl From<NodeKind> for SqlSyntaxKind {
    fn from(kind: NodeKind) -> Self {
        SqlSyntaxKind::Node(kind)
    }
}

impl From<SqlSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SqlSyntaxKind) -> Self {
        rowan::SyntaxKind(kind.to_raw())
    }
}

impl From<TokenType> for rowan::SyntaxKind {
    fn from(ttype: TokenType) -> Self {
        rowan::SyntaxKind(ttype as u16)
    }
}

impl From<NodeKind> for rowan::SyntaxKind {
    fn from(kind: NodeKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_walks_ancestors() {
        assert!(TokenType::KeywordDml.is_a(TokenType::Keyword));
        assert!(TokenType::KeywordDml.is_a(TokenType::KeywordDml));
        assert!(TokenType::KeywordDml.is_a(TokenType::Text));
        assert!(!TokenType::Keyword.is_a(TokenType::KeywordDml));
        assert!(TokenType::Newline.is_a(TokenType::Whitespace));
        assert!(TokenType::StringSingle.is_a(TokenType::Literal));
        assert!(!TokenType::Name.is_a(TokenType::Keyword));
    }

    #[test]
    fn test_all_tables_match_discriminants() {
        for (index, ttype) in TokenType::ALL.iter().enumerate() {
            assert_eq!(*ttype as usize, index);
        }
        for (index, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index + 256);
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        let kinds = [
            SqlSyntaxKind::Token(TokenType::Whitespace),
            SqlSyntaxKind::Token(TokenType::Error),
            SqlSyntaxKind::Node(NodeKind::Statement),
            SqlSyntaxKind::Node(NodeKind::Comment),
        ];
        for kind in kinds {
            assert_eq!(SqlSyntaxKind::from_raw(kind.to_raw()), kind);
        }
        assert_eq!(
            SqlSyntaxKind::from_raw(999),
            SqlSyntaxKind::Token(TokenType::Error)
        );
    }

    #[test]
    fn test_dotted_names() {
        assert_eq!(TokenType::KeywordDml.to_string(), "Keyword.DML");
        assert_eq!(TokenType::OperatorComparison.name(), "Operator.Comparison");
    }
}
