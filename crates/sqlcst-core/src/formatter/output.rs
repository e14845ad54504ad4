//! Statement serialization

use regex::Regex;
use std::sync::LazyLock;

/// A line break, a run without quotes or breaks, or one quoted string
static LINE_PIECE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\r\n|\r|\n|[^\r\n'"]+|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#)
        .expect("line piece pattern is valid")
});

/// Split `text` on line breaks that are not inside a quoted string
pub fn split_unquoted_newlines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    for piece in LINE_PIECE.find_iter(text) {
        if matches!(piece.as_str(), "\r\n" | "\r" | "\n") {
            lines.push(&text[line_start..piece.start()]);
            line_start = piece.end();
        }
    }
    lines.push(&text[line_start..]);
    lines
}

/// Join the unquoted lines of `text` with `\n`, trimming trailing whitespace
pub fn serialize(text: &str) -> String {
    split_unquoted_newlines(text)
        .into_iter()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ignores_quoted_breaks() {
        let text = "select 'a\nb'\nfrom \"x\ny\"\r\nwhere 1";
        assert_eq!(
            split_unquoted_newlines(text),
            vec!["select 'a\nb'", "from \"x\ny\"", "where 1"]
        );
    }

    #[test]
    fn test_split_without_breaks() {
        assert_eq!(split_unquoted_newlines("select 1"), vec!["select 1"]);
        assert_eq!(split_unquoted_newlines(""), vec![""]);
    }

    #[test]
    fn test_serialize_trims_and_normalizes() {
        assert_eq!(serialize("select a,   \r\n  b \rfrom t  "), "select a,\n  b\nfrom t");
    }
}
