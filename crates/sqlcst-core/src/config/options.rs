//! Formatter options: the raw, deserializable form and the validated form

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SqlcstError;
use crate::result::Result;

/// Letter case applied by the case filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    Upper,
    Lower,
    /// First character upper-cased, the rest lower-cased
    Capitalize,
}

impl Case {
    pub fn apply(self, text: &str) -> String {
        match self {
            Case::Upper => text.to_uppercase(),
            Case::Lower => text.to_lowercase(),
            Case::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "upper" => Ok(Case::Upper),
            "lower" => Ok(Case::Lower),
            "capitalize" => Ok(Case::Capitalize),
            other => Err(format!(
                "expected upper, lower or capitalize, got '{other}'"
            )),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Case::Upper => "upper",
            Case::Lower => "lower",
            Case::Capitalize => "capitalize",
        })
    }
}

/// Options as written in a config file or collected from the command line
///
/// Every field is optional so that layers can be merged; unset fields fall
/// back to the [`FormatOptions`] defaults. Keys are accepted in camelCase or
/// snake_case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawFormatOptions {
    #[serde(alias = "keyword_case")]
    pub keyword_case: Option<String>,

    #[serde(alias = "identifier_case")]
    pub identifier_case: Option<String>,

    #[serde(alias = "strip_comments")]
    pub strip_comments: Option<bool>,

    #[serde(alias = "strip_whitespace")]
    pub strip_whitespace: Option<bool>,

    pub reindent: Option<bool>,

    #[serde(alias = "indent_width")]
    pub indent_width: Option<i64>,

    #[serde(alias = "indent_after_first")]
    pub indent_after_first: Option<bool>,

    #[serde(alias = "indent_columns")]
    pub indent_columns: Option<bool>,

    #[serde(alias = "comma_first")]
    pub comma_first: Option<bool>,

    pub compact: Option<bool>,

    /// Column limit for the right-margin filter
    #[serde(alias = "right_margin")]
    pub right_margin: Option<i64>,

    /// Line width after which identifier lists wrap
    #[serde(alias = "wrap_after")]
    pub wrap_after: Option<i64>,
}

impl RawFormatOptions {
    /// Layer `overrides` on top of `self`; set fields of `overrides` win
    pub fn merge(self, overrides: RawFormatOptions) -> RawFormatOptions {
        RawFormatOptions {
            keyword_case: overrides.keyword_case.or(self.keyword_case),
            identifier_case: overrides.identifier_case.or(self.identifier_case),
            strip_comments: overrides.strip_comments.or(self.strip_comments),
            strip_whitespace: overrides.strip_whitespace.or(self.strip_whitespace),
            reindent: overrides.reindent.or(self.reindent),
            indent_width: overrides.indent_width.or(self.indent_width),
            indent_after_first: overrides.indent_after_first.or(self.indent_after_first),
            indent_columns: overrides.indent_columns.or(self.indent_columns),
            comma_first: overrides.comma_first.or(self.comma_first),
            compact: overrides.compact.or(self.compact),
            right_margin: overrides.right_margin.or(self.right_margin),
            wrap_after: overrides.wrap_after.or(self.wrap_after),
        }
    }

    /// Check every value against its domain
    ///
    /// Runs before any input is read, so a bad option never produces partial
    /// output.
    pub fn validate(&self) -> Result<FormatOptions> {
        let defaults = FormatOptions::default();

        let keyword_case = parse_case("keyword_case", self.keyword_case.as_deref())?;
        let identifier_case = parse_case("identifier_case", self.identifier_case.as_deref())?;

        let indent_width = match self.indent_width {
            Some(width) => usize::try_from(width).map_err(|_| {
                SqlcstError::invalid_option("indent_width", "must be a non-negative integer")
            })?,
            None => defaults.indent_width,
        };

        let right_margin = match self.right_margin {
            Some(margin) if margin > 10 => Some(margin as usize),
            Some(_) => {
                return Err(SqlcstError::invalid_option(
                    "right_margin",
                    "must be an integer greater than 10",
                ));
            }
            None => None,
        };

        let wrap_after = match self.wrap_after {
            Some(width) => usize::try_from(width).map_err(|_| {
                SqlcstError::invalid_option("wrap_after", "must be a non-negative integer")
            })?,
            None => defaults.wrap_after,
        };

        Ok(FormatOptions {
            keyword_case,
            identifier_case,
            strip_comments: self.strip_comments.unwrap_or(defaults.strip_comments),
            strip_whitespace: self.strip_whitespace.unwrap_or(defaults.strip_whitespace),
            reindent: self.reindent.unwrap_or(defaults.reindent),
            indent_width,
            indent_after_first: self.indent_after_first.unwrap_or(defaults.indent_after_first),
            indent_columns: self.indent_columns.unwrap_or(defaults.indent_columns),
            comma_first: self.comma_first.unwrap_or(defaults.comma_first),
            compact: self.compact.unwrap_or(defaults.compact),
            right_margin,
            wrap_after,
        })
    }
}

fn parse_case(option: &str, value: Option<&str>) -> Result<Option<Case>> {
    value
        .map(|value| {
            value
                .parse::<Case>()
                .map_err(|message| SqlcstError::invalid_option(option, message))
        })
        .transpose()
}

/// Validated formatter options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub keyword_case: Option<Case>,
    pub identifier_case: Option<Case>,
    pub strip_comments: bool,
    /// Collapse whitespace runs; implied by `reindent`
    pub strip_whitespace: bool,
    pub reindent: bool,
    /// Spaces per indentation step
    pub indent_width: usize,
    /// Indent every line after the first one extra step
    pub indent_after_first: bool,
    /// Indent list items by one step instead of aligning them under the first
    pub indent_columns: bool,
    /// Put the comma at the start of continuation lines
    pub comma_first: bool,
    /// Keep `VALUES` tuples and `CASE` branches on one line
    pub compact: bool,
    pub right_margin: Option<usize>,
    pub wrap_after: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            keyword_case: None,
            identifier_case: None,
            strip_comments: false,
            strip_whitespace: false,
            reindent: false,
            indent_width: 2,
            indent_after_first: false,
            indent_columns: false,
            comma_first: false,
            compact: false,
            right_margin: None,
            wrap_after: 0,
        }
    }
}

impl FormatOptions {
    /// Whether whitespace is collapsed, directly or as part of reindenting
    pub fn strips_whitespace(&self) -> bool {
        self.strip_whitespace || self.reindent
    }
}
