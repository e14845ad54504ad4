//! Round-trip properties over arbitrary input
//!
//! Whatever the input, the statements returned by `parse` cover it exactly,
//! and grouping never reorders, drops or retypes a leaf.

use proptest::prelude::*;
use sqlcst_core::cst::{TokenList, round_trip};
use sqlcst_core::{ElementExt, TokenType, parse, split_statements, tokenize};

/// Leaves of all statements, in order
fn leaves(sql: &str) -> Vec<(TokenType, String)> {
    parse(sql)
        .iter()
        .flat_map(|statement| statement.flatten().collect::<Vec<_>>())
        .map(|token| (token.ttype().unwrap(), token.text().to_string()))
        .collect()
}

/// Whitespace-separated SQL fragments, including malformed combinations
fn sql_fragments() -> impl Strategy<Value = String> {
    let fragments = vec![
        "select", "a", "b.c", "from", "t", "where", "and", "or", "not", "(", ")", "[", "]",
        ",", "=", "<", "1", "2.5", "'s'", "\"q\"", "case", "when", "then", "else", "end",
        "begin", "if", "order by", "group by", "values", "insert", "into", "join", "on", "as",
        "::", "over", "-- c\n", "/* c */", ";", "$1", ":name", "*", "'open",
    ];
    prop::collection::vec(prop::sample::select(fragments), 0..40).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn parse_round_trips_any_text(sql in any::<String>()) {
        prop_assert_eq!(round_trip(&sql), sql);
    }

    #[test]
    fn parse_round_trips_sql_fragments(sql in sql_fragments()) {
        prop_assert_eq!(round_trip(&sql), sql);
    }

    #[test]
    fn split_covers_the_input(sql in any::<String>()) {
        let text: String = split_statements(&sql)
            .flat_map(|statement| statement.into_iter().map(|(_, value)| value))
            .collect();
        prop_assert_eq!(text, sql);
    }

    #[test]
    fn grouping_keeps_leaf_sequence(sql in sql_fragments()) {
        let scanned: Vec<(TokenType, String)> = tokenize(&sql)
            .map(|(ttype, value)| (ttype, value.to_string()))
            .collect();
        prop_assert_eq!(leaves(&sql), scanned);
    }
}

#[test]
fn test_round_trip_examples() {
    for sql in [
        "",
        "   ",
        "select 1;\n\n",
        "SELECT 'unterminated",
        "SELECT (1, 2",
        "select \"a\"\"b\" from [t] -- tail",
        "CREATE FUNCTION f() RETURNS int AS $$ BEGIN RETURN 1; END; $$ LANGUAGE plpgsql;",
        "select a; -- one\n  ",
        "\u{feff}select 1 \u{00a0}",
    ] {
        assert_eq!(round_trip(sql), sql);
    }
}
