//! Statement tree construction
//!
//! Turns flat token lists from the splitter into mutable rowan trees, then
//! runs the grouping engine over each of them.

use rowan::GreenNodeBuilder;

use super::grouping::group;
use super::lexer::Lexer;
use super::splitter::StatementSplitter;
use super::{NodeKind, SqlNode, TokenType};

/// Build an ungrouped Statement root holding `tokens` as direct children
pub fn build_statement(tokens: &[(TokenType, &str)]) -> SqlNode {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(NodeKind::Statement.into());
    for (ttype, text) in tokens {
        builder.token((*ttype).into(), text);
    }
    builder.finish_node();
    SqlNode::new_root_mut(builder.finish())
}

/// Scan, split and group `sql` with the default lexer
///
/// The concatenated text of the returned statements equals `sql`.
pub fn parse(sql: &str) -> Vec<SqlNode> {
    parse_with(Lexer::default_instance(), sql)
}

/// Like [`parse`], scanning with `lexer`
pub fn parse_with(lexer: &Lexer, sql: &str) -> Vec<SqlNode> {
    let statements: Vec<SqlNode> = StatementSplitter::new(lexer.tokenize(sql))
        .map(|tokens| {
            let statement = build_statement(&tokens);
            group(&statement);
            statement
        })
        .collect();
    tracing::debug!(
        statements = statements.len(),
        bytes = sql.len(),
        "Parsed SQL"
    );
    statements
}

/// Parse and return the statements' leaf texts, concatenated
pub fn round_trip(sql: &str) -> String {
    parse(sql)
        .iter()
        .map(|statement| statement.text().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::{AstNode, Statement};
    use crate::cst::tree::TokenList;

    #[test]
    fn test_parse_round_trips() {
        for sql in [
            "",
            "   ",
            "select 1;",
            "SELECT 1; SELECT 2;\n",
            "select 'unterminated",
            "select (1, 2",
            "/* open comment",
            "BEGIN SELECT 1; END; garbage ) ) (",
        ] {
            assert_eq!(round_trip(sql), sql);
        }
    }

    #[test]
    fn test_build_statement_is_flat() {
        let statement = build_statement(&[(TokenType::KeywordDml, "select")]);
        assert_eq!(statement.child_count(), 1);
        assert!(Statement::cast(statement).is_some());
    }

    #[test]
    fn test_parse_with_custom_lexer() {
        let lexer = Lexer::builder()
            .add_keywords([("FETCHALL", TokenType::KeywordDml)])
            .build();
        let statements = parse_with(&lexer, "fetchall x");
        let statement = Statement::cast(statements[0].clone()).unwrap();
        assert_eq!(statement.statement_type(), "FETCHALL");
    }
}
