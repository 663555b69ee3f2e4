//! End-to-end tests over whole programs.
//!
//! Each program in `tests/programs` goes through all four passes and the
//! combined output stream is compared line by line.

use minicpp::pipeline::{parse_source, run_source, Options};
use pretty_assertions::assert_eq;

fn run_program(file: &str, source: &str) -> Vec<String> {
    run_source(source, file, &Options::default())
        .unwrap()
        .into_lines()
}

#[test]
fn test_functions_program() {
    let lines = run_program("functions.cpp", include_str!("programs/functions.cpp"));

    assert_eq!(
        lines,
        vec![
            "g", "l", "e", "7", "99", "7", "99", "o", "7", "99", "99", "1", "2", "3", "7", "42",
            "125", "e", "11", "99", "1", "5", "977"
        ]
    );
}

#[test]
fn test_branches_program() {
    let lines = run_program("branches.cpp", include_str!("programs/branches.cpp"));

    assert_eq!(lines, vec!["1", "7", "2", "7", "y", "z", "20", "3"]);
}

#[test]
fn test_declarations_program() {
    let lines = run_program("declarations.cpp", include_str!("programs/declarations.cpp"));

    assert_eq!(lines, vec!["42", "3", "3", "0", "b", "0"]);
}

#[test]
fn test_classes_program() {
    let lines = run_program("classes.cpp", include_str!("programs/classes.cpp"));

    assert_eq!(
        lines,
        vec!["w", "4", "w", "4", "9", "13", "6", "14", "~"]
    );
}

#[test]
fn test_diagnostics_precede_program_output() {
    let lines = run_program("diagnostics.cpp", include_str!("programs/diagnostics.cpp"));

    assert_eq!(
        lines,
        vec![
            "Error: such symbol a already exists",
            "Error: arg and param count mismatch at function twice: expected 1, received 2",
            "Error: no such variable: missing",
            "Error: type mismatch in declaration of flag: type bool cannot be int",
            "4",
            "1",
            "0"
        ]
    );
}

#[test]
fn test_check_only_reports_without_running() {
    let options = Options {
        echo: false,
        evaluate: false,
    };
    let out = run_source(include_str!("programs/diagnostics.cpp"), "diagnostics.cpp", &options).unwrap();

    assert_eq!(out.errors().count(), 4);
    assert!(out.lines().iter().all(|line| line.starts_with("Error: ")));
}

#[test]
fn test_syntax_error_is_returned() {
    assert!(parse_source("int main() { int x = ; }", "broken.cpp").is_err());
}
