//! CLI command implementation
//!
//! Options are resolved and validated first; then all inputs are read,
//! formatted on the rayon pool and written in argument order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use sqlcst_core::cst::{TokenList, decode, parse};
use sqlcst_core::{ConfigLoader, FormatOptions, format};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::Cli;

/// One input: its display name and decoded text
struct Input {
    name: String,
    text: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(cli)?;
    debug!("Resolved options: {:?}", options);

    let start_time = Instant::now();
    let inputs = cli
        .files
        .iter()
        .map(|path| read_input(path, &cli.encoding))
        .collect::<Result<Vec<_>>>()?;

    let rendered: Vec<String> = inputs
        .par_iter()
        .map(|input| {
            debug!("Processing {}", input.name);
            if cli.tree {
                render_tree(&input.text)
            } else {
                format(&input.text, &options)
            }
        })
        .collect();
    let output = rendered.concat();

    match &cli.outfile {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("Failed to write to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }

    info!(
        "Processed {} input(s) in {:?}",
        inputs.len(),
        start_time.elapsed()
    );
    Ok(())
}

/// Config file values overridden by command-line flags, validated
fn resolve_options(cli: &Cli) -> Result<FormatOptions> {
    let start_dir = discovery_start(&cli.files);
    let from_file = ConfigLoader::load(cli.config.as_deref(), &start_dir)?;
    let options = from_file.merge(cli.format_overrides()).validate()?;
    Ok(options)
}

/// Directory of the first file argument, or the working directory
fn discovery_start(files: &[PathBuf]) -> PathBuf {
    files
        .iter()
        .find(|path| path.as_os_str() != "-")
        .and_then(|path| path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn read_input(path: &Path, encoding: &str) -> Result<Input> {
    let (name, bytes) = if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read standard input")?;
        ("<stdin>".to_string(), bytes)
    } else {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        (path.display().to_string(), bytes)
    };
    let text = decode(&bytes, Some(encoding))
        .with_context(|| format!("Failed to decode {name}"))?
        .into_owned();
    Ok(Input { name, text })
}

/// Indented dump of every statement's grouped tree
fn render_tree(text: &str) -> String {
    parse(text)
        .iter()
        .map(|statement| statement.pprint_tree())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_start() {
        assert_eq!(discovery_start(&[]), PathBuf::from("."));
        assert_eq!(
            discovery_start(&[PathBuf::from("-"), PathBuf::from("sql/a.sql")]),
            PathBuf::from("sql")
        );
        assert_eq!(discovery_start(&[PathBuf::from("a.sql")]), PathBuf::from("."));
    }

    #[test]
    fn test_render_tree() {
        let tree = render_tree("select 1");
        assert!(tree.starts_with("Statement\n"));
        assert!(tree.contains("  Keyword.DML \"select\""));
    }
}
