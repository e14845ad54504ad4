//! Rowan language implementation for SQL
//!
//! Connects [`SqlSyntaxKind`] to Rowan's generic tree types.

use rowan::Language;

use super::SqlSyntaxKind;

/// Language marker for SQL syntax trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqlLanguage;

impl Language for SqlLanguage {
    type Kind = SqlSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SqlSyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Composite node of the SQL CST
pub type SqlNode = rowan::SyntaxNode<SqlLanguage>;
/// Leaf token of the SQL CST
pub type SqlToken = rowan::SyntaxToken<SqlLanguage>;
/// Either a node or a token
pub type SqlElement = rowan::SyntaxElement<SqlLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{NodeKind, TokenType};

    #[test]
    fn test_kind_roundtrip_through_rowan() {
        let kinds = [
            SqlSyntaxKind::Token(TokenType::Whitespace),
            SqlSyntaxKind::Token(TokenType::KeywordDml),
            SqlSyntaxKind::Node(NodeKind::Statement),
            SqlSyntaxKind::Node(NodeKind::IdentifierList),
        ];

        for kind in kinds {
            let raw = SqlLanguage::kind_to_raw(kind);
            let back = SqlLanguage::kind_from_raw(raw);
            assert_eq!(kind, back, "Roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn test_kind_values() {
        assert_eq!(SqlLanguage::kind_to_raw(TokenType::Text.into()).0, 0);
        assert_eq!(SqlLanguage::kind_to_raw(NodeKind::Statement.into()).0, 256);
    }
}
