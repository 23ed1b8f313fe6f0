//! End-to-end CLI tests exercising the `faxc` binary exactly as a user would invoke it.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::NamedTempFile;
use std::io::Write;

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn compiles_a_well_formed_program_and_prints_target_code() {
    let file = source_file("function main() { int x = 2 + 3; print(x); }");
    Command::cargo_bin("faxc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("print("));
}

#[test]
fn reports_a_nonzero_exit_code_for_a_program_with_errors() {
    let file = source_file("function main() { print(y); }");
    Command::cargo_bin("faxc")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(contains("not declared"));
}

#[test]
fn emit_tokens_prints_the_token_stream_instead_of_target_code() {
    let file = source_file("function main() { }");
    Command::cargo_bin("faxc")
        .unwrap()
        .arg(file.path())
        .arg("--emit")
        .arg("tokens")
        .assert()
        .success()
        .stdout(contains("Keyword"));
}

#[test]
fn no_optimize_still_produces_target_code() {
    let file = source_file("function main() { int x = 2 + 3; print(x); }");
    Command::cargo_bin("faxc")
        .unwrap()
        .arg(file.path())
        .arg("--no-optimize")
        .assert()
        .success()
        .stdout(contains("print("));
}

#[test]
fn missing_input_file_fails_with_a_read_error() {
    Command::cargo_bin("faxc")
        .unwrap()
        .arg("/nonexistent/path/to/nowhere.fax")
        .assert()
        .failure();
}

#[test]
fn output_flag_writes_to_a_file_instead_of_stdout() {
    let file = source_file("function main() { int x = 1; print(x); }");
    let out = tempfile::NamedTempFile::new().unwrap();
    Command::cargo_bin("faxc")
        .unwrap()
        .arg(file.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();
    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.contains("print("));
}
