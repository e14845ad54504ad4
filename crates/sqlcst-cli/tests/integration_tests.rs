//! Integration tests for the sqlcst CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("sqlcst").unwrap()
}

/// Temporary directory holding one SQL file
fn create_test_file(content: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("query.sql"), content).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Format SQL files"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_no_files_prints_help_and_fails() {
    cli()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_passthrough_without_options() {
    let temp_dir = create_test_file("select *  from t; -- keep\n");
    cli()
        .current_dir(temp_dir.path())
        .arg("query.sql")
        .assert()
        .success()
        .stdout("select *  from t; -- keep\n");
}

#[test]
fn test_reindent() {
    let temp_dir = create_test_file("select a, b from t where x = 1");
    cli()
        .current_dir(temp_dir.path())
        .args(["-r", "query.sql"])
        .assert()
        .success()
        .stdout("select a,\n       b\nfrom t\nwhere x = 1");
}

#[test]
fn test_stdin_and_keyword_case() {
    cli()
        .args(["-k", "upper", "-"])
        .write_stdin("select 1 from dual")
        .assert()
        .success()
        .stdout("SELECT 1 FROM dual");
}

#[test]
fn test_outfile() {
    let temp_dir = create_test_file("select 1");
    let out = temp_dir.path().join("out.sql");
    cli()
        .current_dir(temp_dir.path())
        .args(["-k", "upper", "-o"])
        .arg(&out)
        .arg("query.sql")
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(out).unwrap(), "SELECT 1");
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .arg("missing.sql")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read missing.sql"));
}

#[test]
fn test_invalid_option_fails_before_reading() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["--indent-width", "-2", "missing.sql"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("indent_width"))
        .stderr(predicate::str::contains("Failed to read").not());
}

#[test]
fn test_invalid_encoding_fails() {
    let temp_dir = create_test_file("select 1");
    cli()
        .current_dir(temp_dir.path())
        .args(["--encoding", "klingon", "query.sql"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("klingon"));
}

#[test]
fn test_latin1_input() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("query.sql"), b"select '\xe9'").unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["--encoding", "latin-1", "query.sql"])
        .assert()
        .success()
        .stdout("select 'é'");
}

#[test]
fn test_config_file_is_discovered() {
    let temp_dir = create_test_file("select a from t");
    fs::write(
        temp_dir.path().join(".sqlcst.toml"),
        "keywordCase = \"upper\"\n",
    )
    .unwrap();
    cli()
        .current_dir(temp_dir.path())
        .arg("query.sql")
        .assert()
        .success()
        .stdout("SELECT a FROM t");
}

#[test]
fn test_flags_override_config_file() {
    let temp_dir = create_test_file("select a from t");
    fs::write(
        temp_dir.path().join("custom.json"),
        r#"{ "keyword_case": "upper" }"#,
    )
    .unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["--config", "custom.json", "-k", "capitalize", "query.sql"])
        .assert()
        .success()
        .stdout("Select a From t");
}

#[test]
fn test_invalid_config_value_fails() {
    let temp_dir = create_test_file("select 1");
    fs::write(
        temp_dir.path().join(".sqlcst.json"),
        r#"{ "keywordCase": "shouting" }"#,
    )
    .unwrap();
    cli()
        .current_dir(temp_dir.path())
        .arg("query.sql")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("keyword_case"));
}

#[test]
fn test_multiple_files_keep_order() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.sql"), "select 1;\n").unwrap();
    fs::write(temp_dir.path().join("b.sql"), "select 2;\n").unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["a.sql", "b.sql"])
        .assert()
        .success()
        .stdout("select 1;\nselect 2;\n");
}

#[test]
fn test_tree_output() {
    cli()
        .args(["--tree", "-"])
        .write_stdin("select a from t")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Statement\n"))
        .stdout(predicate::str::contains("  Keyword.DML \"select\""))
        .stdout(predicate::str::contains("Identifier"));
}
