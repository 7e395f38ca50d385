//! End-to-end tests for the `recode` subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use tempfile::TempDir;

use recode_cli::cli::{Cli, Command};
use recode_cli::commands::{run_apply, run_inspect, run_vector};
use recode_cli::summary::{apply_table, rules_table, vector_lines};

const YES_NO: &str = "from,to\nY,Yes\nN,No\n.regex [Yy]es,Yes\n.missing,Missing\n.default,Unknown\n";

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["recode"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_vector_prints_one_value_per_line() {
    let dir = TempDir::new().unwrap();
    let dictionary = write_csv(&dir, "yes_no.csv", YES_NO);
    let Command::Vector(args) = parse(&[
        "vector",
        "--dictionary",
        path_arg(&dictionary),
        "Y",
        "yes",
        "NA",
        "",
        "maybe",
    ]) else {
        panic!("expected vector command");
    };

    let result = run_vector(&args).unwrap();

    insta::assert_snapshot!(vector_lines(&result).join("\n"), @r"
    Yes
    Yes
    Missing
    Missing
    Unknown
    ");
    assert_eq!(result.changed, 5);
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_vector_silent_and_categorical() {
    let dir = TempDir::new().unwrap();
    let dictionary = write_csv(&dir, "yes_no.csv", YES_NO);
    let Command::Vector(args) = parse(&[
        "vector",
        "--dictionary",
        path_arg(&dictionary),
        "--silent",
        "--categorical",
        "N",
        "Y",
        "junk",
    ]) else {
        panic!("expected vector command");
    };

    let result = run_vector(&args).unwrap();

    assert!(result.diagnostics.is_empty());
    insta::assert_snapshot!(vector_lines(&result).join("\n"), @r"
    No
    Yes
    Unknown
    Levels: Yes < No < Missing < Unknown
    ");
}

#[test]
fn test_vector_selects_columns_by_name() {
    let dir = TempDir::new().unwrap();
    let dictionary = write_csv(&dir, "dict.csv", "note,raw,clean\nx,a,Alpha\n");
    let Command::Vector(args) = parse(&[
        "vector",
        "-d",
        path_arg(&dictionary),
        "--from",
        "raw",
        "--to",
        "3",
        "a",
    ]) else {
        panic!("expected vector command");
    };

    let result = run_vector(&args).unwrap();

    assert_eq!(result.labels, vec![Some("Alpha".to_string())]);
}

#[test]
fn test_vector_reports_unknown_column() {
    let dir = TempDir::new().unwrap();
    let dictionary = write_csv(&dir, "yes_no.csv", YES_NO);
    let Command::Vector(args) = parse(&[
        "vector",
        "-d",
        path_arg(&dictionary),
        "--from",
        "key",
        "Y",
    ]) else {
        panic!("expected vector command");
    };

    let error = run_vector(&args).unwrap_err();
    assert!(format!("{error:#}").contains("key"));
}

#[test]
fn test_zero_column_position_is_rejected() {
    let result = Cli::try_parse_from(["recode", "inspect", "-d", "dict.csv", "--from", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_apply_writes_resolved_output() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, "data.csv", "id,smoker,drinker\n1,Y,n\n2,,y\n3,junk,\n");
    let dictionary = write_csv(
        &dir,
        "dict.csv",
        "from,to,variable\n\
         Y,Yes,smoker\n\
         .default,Other,smoker\n\
         y,Yes,.regex er$\n\
         n,No,.regex er$\n\
         .missing,Missing,.global\n",
    );
    let output = dir.path().join("out.csv");
    let Command::Apply(args) = parse(&[
        "apply",
        "--data",
        path_arg(&data),
        "--dictionary",
        path_arg(&dictionary),
        "--warn",
        "--output",
        path_arg(&output),
    ]) else {
        panic!("expected apply command");
    };

    let result = run_apply(&args).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written, @r"
    id,smoker,drinker
    1,Yes,No
    2,Missing,Yes
    3,Other,Missing
    ");
    assert_eq!(result.rows, 3);
    assert_eq!(result.report.columns.len(), 3);
    assert_eq!(apply_table(&result).row_count(), 4);
}

#[test]
fn test_inspect_lists_compiled_rules() {
    let dir = TempDir::new().unwrap();
    let dictionary = write_csv(&dir, "yes_no.csv", &format!("{YES_NO}Y,Oui\n"));
    let Command::Inspect(args) = parse(&["inspect", "-d", path_arg(&dictionary)]) else {
        panic!("expected inspect command");
    };

    let result = run_inspect(&args).unwrap();

    assert_eq!(result.rules.rules().len(), 5);
    assert_eq!(result.rules.report().duplicate_keys, vec!["Y".to_string()]);
    assert_eq!(rules_table(&result).row_count(), 5);
}
