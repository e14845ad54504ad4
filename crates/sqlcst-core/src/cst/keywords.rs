//! Keyword tables consulted by the lexer
//!
//! Tables are searched in the order they were added to a
//! [`LexerBuilder`](super::LexerBuilder); the first table containing a word
//! decides its type. Keys are upper case.

use super::TokenType::{self, Keyword, KeywordCte, KeywordDdl, KeywordDml, NameBuiltin};

/// Statement verbs and the words every dialect reserves
pub static KEYWORDS_COMMON: &[(&str, TokenType)] = &[
    ("SELECT", KeywordDml),
    ("INSERT", KeywordDml),
    ("DELETE", KeywordDml),
    ("UPDATE", KeywordDml),
    ("UPSERT", KeywordDml),
    ("REPLACE", KeywordDml),
    ("MERGE", KeywordDml),
    ("CREATE", KeywordDdl),
    ("DROP", KeywordDdl),
    ("ALTER", KeywordDdl),
    ("TRUNCATE", KeywordDdl),
    ("WITH", KeywordCte),
    ("WHERE", Keyword),
    ("FROM", Keyword),
    ("INNER", Keyword),
    ("JOIN", Keyword),
    ("STRAIGHT_JOIN", Keyword),
    ("AND", Keyword),
    ("OR", Keyword),
    ("ON", Keyword),
    ("SET", Keyword),
    ("BY", Keyword),
    ("GROUP", Keyword),
    ("ORDER", Keyword),
    ("LEFT", Keyword),
    ("RIGHT", Keyword),
    ("OUTER", Keyword),
    ("FULL", Keyword),
    ("IF", Keyword),
    ("END", Keyword),
    ("THEN", Keyword),
    ("LOOP", Keyword),
    ("AS", Keyword),
    ("ELSE", Keyword),
    ("FOR", Keyword),
    ("WHILE", Keyword),
    ("CASE", Keyword),
    ("WHEN", Keyword),
    ("DISTINCT", Keyword),
];

/// General SQL vocabulary
pub static KEYWORDS: &[(&str, TokenType)] = &[
    ("ALL", Keyword),
    ("ANY", Keyword),
    ("BEGIN", Keyword),
    ("BETWEEN", Keyword),
    ("CASCADE", Keyword),
    ("CHECK", Keyword),
    ("COLUMN", Keyword),
    ("COMMIT", Keyword),
    ("CONSTRAINT", Keyword),
    ("CROSS", Keyword),
    ("CURRENT_DATE", Keyword),
    ("CURRENT_TIME", Keyword),
    ("CURRENT_TIMESTAMP", Keyword),
    ("DATABASE", Keyword),
    ("DAY", Keyword),
    ("DECLARE", Keyword),
    ("DEFAULT", Keyword),
    ("DO", Keyword),
    ("EACH", Keyword),
    ("ELSIF", Keyword),
    ("EXCEPT", Keyword),
    ("EXCEPTION", Keyword),
    ("EXECUTE", Keyword),
    ("EXISTS", Keyword),
    ("FALSE", Keyword),
    ("FETCH", Keyword),
    ("FILTER", Keyword),
    ("FIRST", Keyword),
    ("FOREACH", Keyword),
    ("FOREIGN", Keyword),
    ("FUNCTION", Keyword),
    ("GO", Keyword),
    ("GRANT", Keyword),
    ("HAVING", Keyword),
    ("HOUR", Keyword),
    ("INDEX", Keyword),
    ("INTERSECT", Keyword),
    ("INTO", Keyword),
    ("IS", Keyword),
    ("KEY", Keyword),
    ("LANGUAGE", Keyword),
    ("LAST", Keyword),
    ("LIMIT", Keyword),
    ("MINUTE", Keyword),
    ("MONTH", Keyword),
    ("NATURAL", Keyword),
    ("NOT", Keyword),
    ("NULL", Keyword),
    ("NULLS", Keyword),
    ("OF", Keyword),
    ("OFFSET", Keyword),
    ("ONLY", Keyword),
    ("OVER", Keyword),
    ("PARTITION", Keyword),
    ("PRIMARY", Keyword),
    ("PROCEDURE", Keyword),
    ("RECURSIVE", Keyword),
    ("REFERENCES", Keyword),
    ("RETURN", Keyword),
    ("RETURNING", Keyword),
    ("RETURNS", Keyword),
    ("REVOKE", Keyword),
    ("ROLE", Keyword),
    ("ROLLBACK", Keyword),
    ("ROW", Keyword),
    ("ROWS", Keyword),
    ("SCHEMA", Keyword),
    ("SECOND", Keyword),
    ("SHARE", Keyword),
    ("TABLE", Keyword),
    ("TEMP", Keyword),
    ("TEMPORARY", Keyword),
    ("TIMESTAMP", Keyword),
    ("TO", Keyword),
    ("TRAN", Keyword),
    ("TRANSACTION", Keyword),
    ("TRIGGER", Keyword),
    ("TRUE", Keyword),
    ("UNION", Keyword),
    ("UNIQUE", Keyword),
    ("USING", Keyword),
    ("VALUES", Keyword),
    ("VIEW", Keyword),
    ("WEEK", Keyword),
    ("WINDOW", Keyword),
    ("WORK", Keyword),
    ("YEAR", Keyword),
];

/// PL/pgSQL block vocabulary
pub static KEYWORDS_PLPGSQL: &[(&str, TokenType)] = &[
    ("CONTINUE", Keyword),
    ("EXIT", Keyword),
    ("FOUND", Keyword),
    ("NOTICE", Keyword),
    ("PERFORM", Keyword),
    ("RAISE", Keyword),
    ("RECORD", Keyword),
    ("REVERSE", Keyword),
    ("SLICE", Keyword),
];

/// Built-in type names
pub static KEYWORDS_TYPES: &[(&str, TokenType)] = &[
    ("ARRAY", NameBuiltin),
    ("BIGINT", NameBuiltin),
    ("BIGSERIAL", NameBuiltin),
    ("BINARY", NameBuiltin),
    ("BIT", NameBuiltin),
    ("BLOB", NameBuiltin),
    ("BOOLEAN", NameBuiltin),
    ("BYTEA", NameBuiltin),
    ("CHAR", NameBuiltin),
    ("CHARACTER", NameBuiltin),
    ("DATE", NameBuiltin),
    ("DATETIME", NameBuiltin),
    ("DEC", NameBuiltin),
    ("DECIMAL", NameBuiltin),
    ("FLOAT", NameBuiltin),
    ("INT", NameBuiltin),
    ("INT8", NameBuiltin),
    ("INTEGER", NameBuiltin),
    ("INTERVAL", NameBuiltin),
    ("JSON", NameBuiltin),
    ("JSONB", NameBuiltin),
    ("NUMERIC", NameBuiltin),
    ("REAL", NameBuiltin),
    ("SERIAL", NameBuiltin),
    ("SMALLINT", NameBuiltin),
    ("TEXT", NameBuiltin),
    ("TIME", NameBuiltin),
    ("TINYINT", NameBuiltin),
    ("UNSIGNED", NameBuiltin),
    ("UUID", NameBuiltin),
    ("VARCHAR", NameBuiltin),
    ("VARCHAR2", NameBuiltin),
    ("VARYING", NameBuiltin),
];

/// Default lookup order
pub static DEFAULT_TABLES: &[&[(&str, TokenType)]] =
    &[KEYWORDS_COMMON, KEYWORDS, KEYWORDS_PLPGSQL, KEYWORDS_TYPES];

/// Keywords that still read as a function name when a `(` follows directly
pub static FUNCTION_KEYWORDS: &[&str] = &[
    "LEFT", "RIGHT", "REPLACE", "TRUNCATE", "YEAR", "MONTH", "DAY", "HOUR", "MINUTE", "SECOND",
];

/// Operator runs classified as comparisons
pub static COMPARISON_OPERATORS: &[&str] = &[
    "=", "==", "!=", "<>", "<", ">", "<=", ">=", "<=>", "~", "!~", "@>", "<@",
];
