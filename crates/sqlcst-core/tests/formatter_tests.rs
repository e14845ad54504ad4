//! Formatter behaviour through the public API

use proptest::prelude::*;
use sqlcst_core::{Case, FormatOptions, RawFormatOptions, SqlcstError, format};

fn options(raw: RawFormatOptions) -> FormatOptions {
    raw.validate().unwrap()
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_reindent_from_raw_options() {
    let options = options(RawFormatOptions {
        reindent: Some(true),
        keyword_case: Some("upper".to_string()),
        ..Default::default()
    });
    insta::assert_snapshot!(
        format("select a, b from t join u on t.id = u.id where a = 1 group by a", &options),
        @r"
    SELECT a,
           b
    FROM t
    JOIN u ON t.id = u.id
    WHERE a = 1
    GROUP BY a
    "
    );
}

#[test]
fn test_indent_columns() {
    let options = FormatOptions {
        reindent: true,
        indent_columns: true,
        ..Default::default()
    };
    assert_eq!(
        format("select a, b, c from t", &options),
        "select\n  a,\n  b,\n  c\nfrom t"
    );
}

#[test]
fn test_comma_first() {
    let options = FormatOptions {
        reindent: true,
        comma_first: true,
        ..Default::default()
    };
    assert_eq!(
        format("select a, b, c from t", &options),
        "select a\n     , b\n     , c\nfrom t"
    );
}

#[test]
fn test_values_tuples() {
    let options = FormatOptions {
        reindent: true,
        ..Default::default()
    };
    assert_eq!(
        format("insert into t values (1, 2), (3, 4)", &options),
        "insert into t\nvalues (1, 2),\n       (3, 4)"
    );

    let compact = FormatOptions {
        compact: true,
        ..options
    };
    assert_eq!(
        format("insert into t values (1, 2), (3, 4)", &compact),
        "insert into t\nvalues (1, 2), (3, 4)"
    );
}

#[test]
fn test_identifier_and_keyword_case() {
    let options = FormatOptions {
        keyword_case: Some(Case::Lower),
        identifier_case: Some(Case::Upper),
        ..Default::default()
    };
    assert_eq!(
        format("SELECT name, \"Quoted\" FROM users", &options),
        "select NAME, \"Quoted\" from USERS"
    );
}

#[test]
fn test_strip_comments_and_whitespace() {
    let options = FormatOptions {
        strip_comments: true,
        strip_whitespace: true,
        ..Default::default()
    };
    assert_eq!(
        format("select a, -- first\n  b /* second */ from   t", &options),
        "select a, b from t"
    );
}

#[test]
fn test_quoted_newlines_survive_reindent() {
    let options = FormatOptions {
        reindent: true,
        ..Default::default()
    };
    assert_eq!(
        format("select 'a  \nb' from t", &options),
        "select 'a  \nb'\nfrom t"
    );
}

#[test]
fn test_invalid_raw_options() {
    let err = RawFormatOptions {
        right_margin: Some(5),
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, SqlcstError::InvalidOption { ref option, .. } if option == "right_margin"));
}

fn sql_fragments() -> impl Strategy<Value = String> {
    let fragments = vec![
        "select", "a", "b", "from", "t", "where", "and", "or", "(", ")", ",", "=", "1",
        "'s'", "case", "when", "then", "else", "end", "order by", "values", "insert", "into",
        "join", "on", "-- c\n", "/* c */", ";", "between",
    ];
    prop::collection::vec(prop::sample::select(fragments), 0..30).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn default_options_leave_text_unchanged(sql in any::<String>()) {
        prop_assert_eq!(format(&sql, &FormatOptions::default()), sql);
    }

    #[test]
    fn reindent_only_changes_whitespace(sql in sql_fragments()) {
        let options = FormatOptions { reindent: true, ..Default::default() };
        prop_assert_eq!(without_whitespace(&format(&sql, &options)), without_whitespace(&sql));
    }
}
