//! Open/close/extend rules per node kind
//!
//! The grouping engine consults this table instead of per-kind logic for the
//! bracket-like kinds and the keyword clauses.

use super::NodeKind;
use super::TokenType::{self, Keyword, NameBuiltin, Punctuation, StringSingle};
use super::tree::ElementExt;

/// A token of exactly `ttype`, optionally restricted to `values`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub ttype: TokenType,
    pub values: &'static [&'static str],
}

impl Pattern {
    const fn new(ttype: TokenType, values: &'static [&'static str]) -> Self {
        Self { ttype, values }
    }

    pub fn matches(&self, element: &impl ElementExt) -> bool {
        element.matches(self.ttype, self.values)
    }
}

/// Matcher rules for one node kind
#[derive(Debug, Clone, Copy)]
pub struct KindMatcher {
    pub open: &'static [Pattern],
    pub close: &'static [Pattern],
    /// Tokens that may follow a finished node and join it
    pub extend: &'static [Pattern],
}

impl KindMatcher {
    pub fn opens(&self, element: &impl ElementExt) -> bool {
        self.open.iter().any(|pattern| pattern.matches(element))
    }

    pub fn closes(&self, element: &impl ElementExt) -> bool {
        self.close.iter().any(|pattern| pattern.matches(element))
    }

    pub fn extends(&self, element: &impl ElementExt) -> bool {
        self.extend.iter().any(|pattern| pattern.matches(element))
    }
}

/// Kinds grouped by the matched-bracket pass, in pass order
pub const BRACKET_KINDS: [NodeKind; 6] = [
    NodeKind::SquareBrackets,
    NodeKind::Parenthesis,
    NodeKind::Case,
    NodeKind::If,
    NodeKind::For,
    NodeKind::Begin,
];

static SQUARE_BRACKETS: KindMatcher = KindMatcher {
    open: &[Pattern::new(Punctuation, &["["])],
    close: &[Pattern::new(Punctuation, &["]"])],
    extend: &[],
};

static PARENTHESIS: KindMatcher = KindMatcher {
    open: &[Pattern::new(Punctuation, &["("])],
    close: &[Pattern::new(Punctuation, &[")"])],
    extend: &[],
};

static CASE: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["CASE"])],
    close: &[Pattern::new(Keyword, &["END"])],
    extend: &[],
};

static IF: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["IF"])],
    close: &[Pattern::new(Keyword, &["END IF"])],
    extend: &[],
};

static FOR: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["FOR", "FOREACH"])],
    close: &[Pattern::new(Keyword, &["END LOOP"])],
    extend: &[],
};

static BEGIN: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["BEGIN"])],
    close: &[Pattern::new(Keyword, &["END"])],
    extend: &[],
};

static TYPED_LITERAL: KindMatcher = KindMatcher {
    open: &[
        Pattern::new(NameBuiltin, &[]),
        Pattern::new(Keyword, &["TIMESTAMP"]),
    ],
    close: &[Pattern::new(StringSingle, &[])],
    extend: &[Pattern::new(
        Keyword,
        &["DAY", "HOUR", "MINUTE", "MONTH", "SECOND", "YEAR"],
    )],
};

static WHERE: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["WHERE"])],
    close: &[Pattern::new(
        Keyword,
        &[
            "ORDER BY",
            "GROUP BY",
            "LIMIT",
            "UNION",
            "UNION ALL",
            "EXCEPT",
            "HAVING",
            "RETURNING",
            "INTO",
        ],
    )],
    extend: &[],
};

static HAVING: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["HAVING"])],
    close: &[Pattern::new(Keyword, &["ORDER BY", "LIMIT"])],
    extend: &[],
};

static OVER: KindMatcher = KindMatcher {
    open: &[Pattern::new(Keyword, &["OVER"])],
    close: &[],
    extend: &[],
};

/// Matcher rules for `kind`, if it has any
pub fn matcher(kind: NodeKind) -> Option<&'static KindMatcher> {
    match kind {
        NodeKind::SquareBrackets => Some(&SQUARE_BRACKETS),
        NodeKind::Parenthesis => Some(&PARENTHESIS),
        NodeKind::Case => Some(&CASE),
        NodeKind::If => Some(&IF),
        NodeKind::For => Some(&FOR),
        NodeKind::Begin => Some(&BEGIN),
        NodeKind::TypedLiteral => Some(&TYPED_LITERAL),
        NodeKind::Where => Some(&WHERE),
        NodeKind::Having => Some(&HAVING),
        NodeKind::Over => Some(&OVER),
        _ => None,
    }
}
