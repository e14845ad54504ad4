//! sqlcst CLI
//!
//! Formats SQL files and prints their syntax trees.

mod commands;

use clap::{CommandFactory, Parser, ValueEnum};
use sqlcst_core::{Case, RawFormatOptions, init_tracing};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "sqlcst")]
#[command(about = "Format SQL files")]
#[command(version = sqlcst_core::VERSION)]
#[command(override_usage = "sqlcst [OPTIONS] FILE...")]
#[command(
    long_about = "Format SQL files.\n\
\n\
Options given on the command line override values from a .sqlcst.toml or\n\
.sqlcst.json file found in the working directory or one of its parents.\n\
\n\
Examples:\n  \
sqlcst -r query.sql              # Reindent a file\n  \
sqlcst -k upper -o out.sql a.sql # Upper-case keywords into out.sql\n  \
cat q.sql | sqlcst -r -          # Read from stdin\n  \
sqlcst --tree query.sql          # Print the grouped syntax tree"
)]
pub struct Cli {
    /// Files to be processed; `-` reads standard input
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Write output to FILE
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Reindent statements
    #[arg(short, long)]
    pub reindent: bool,

    /// Input encoding
    #[arg(long, default_value = "utf-8")]
    pub encoding: String,

    /// Number of spaces for indentation
    #[arg(long, value_name = "WIDTH", allow_negative_numbers = true)]
    pub indent_width: Option<i64>,

    /// Change case of keywords
    #[arg(short, long, value_enum, value_name = "CASE")]
    pub keywords: Option<CaseArg>,

    /// Change case of identifiers
    #[arg(short, long, value_enum, value_name = "CASE")]
    pub identifiers: Option<CaseArg>,

    /// Remove comments
    #[arg(long)]
    pub strip_comments: bool,

    /// Collapse whitespace
    #[arg(long)]
    pub strip_whitespace: bool,

    /// Put commas at the start of continuation lines
    #[arg(long)]
    pub comma_first: bool,

    /// Keep VALUES tuples and CASE branches on one line
    #[arg(long)]
    pub compact: bool,

    /// Indent every line after the first one extra step
    #[arg(long)]
    pub indent_after_first: bool,

    /// Indent list items one step instead of aligning them
    #[arg(long)]
    pub indent_columns: bool,

    /// Wrap lines after this column
    #[arg(long, value_name = "WIDTH", allow_negative_numbers = true)]
    pub right_margin: Option<i64>,

    /// Wrap identifier lists after this many characters
    #[arg(long, value_name = "WIDTH", allow_negative_numbers = true)]
    pub wrap_after: Option<i64>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Path to configuration file (.sqlcst.toml/.sqlcst.json)"
    )]
    pub config: Option<PathBuf>,

    /// Print the grouped syntax tree instead of formatting
    #[arg(long)]
    pub tree: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        help = "Number of threads (default: number of CPU cores)"
    )]
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CaseArg {
    Upper,
    Lower,
    Capitalize,
}

impl From<CaseArg> for Case {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Upper => Case::Upper,
            CaseArg::Lower => Case::Lower,
            CaseArg::Capitalize => Case::Capitalize,
        }
    }
}

impl Cli {
    /// Formatter options set on the command line; unset flags stay `None`
    pub fn format_overrides(&self) -> RawFormatOptions {
        let flag = |set: bool| set.then_some(true);
        RawFormatOptions {
            keyword_case: self.keywords.map(|case| Case::from(case).to_string()),
            identifier_case: self.identifiers.map(|case| Case::from(case).to_string()),
            strip_comments: flag(self.strip_comments),
            strip_whitespace: flag(self.strip_whitespace),
            reindent: flag(self.reindent),
            indent_width: self.indent_width,
            indent_after_first: flag(self.indent_after_first),
            indent_columns: flag(self.indent_columns),
            comma_first: flag(self.comma_first),
            compact: flag(self.compact),
            right_margin: self.right_margin,
            wrap_after: self.wrap_after,
        }
    }
}

fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "sqlcst=error,sqlcst_core=error", // Only errors by default
        1 => "sqlcst=warn,sqlcst_core=warn",
        2 => "sqlcst=info,sqlcst_core=info",
        3 => "sqlcst=debug,sqlcst_core=debug",
        _ => "sqlcst=trace,sqlcst_core=trace",
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(log_directive(cli.verbose));

    if cli.files.is_empty() {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    }

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = commands::run(&cli) {
        error!("{:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let cli = Cli::parse_from(["sqlcst", "a.sql"]);
        assert_eq!(cli.format_overrides(), RawFormatOptions::default());
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::parse_from([
            "sqlcst",
            "-r",
            "-k",
            "upper",
            "--indent-width",
            "4",
            "--right-margin",
            "-1",
            "a.sql",
        ]);
        let overrides = cli.format_overrides();
        assert_eq!(overrides.reindent, Some(true));
        assert_eq!(overrides.keyword_case.as_deref(), Some("upper"));
        assert_eq!(overrides.indent_width, Some(4));
        assert_eq!(overrides.right_margin, Some(-1));
        assert_eq!(overrides.strip_comments, None);
    }
}
