//! End-to-end tests of the `things` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn things() -> Command {
    Command::cargo_bin("things").expect("binary builds")
}

#[test]
fn eval_prints_the_result() {
    things()
        .args(["--eval", "1 + 2 * 3"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn eval_of_null_prints_nothing() {
    things()
        .args(["--eval", "x := 1"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn runs_a_script_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
var sum = 0
var v = 0
while v < 10 {{ v += 1; sum += v; }}
fmt.println("sum:", sum)
"#
    )
    .unwrap();

    things()
        .arg(file.path())
        .assert()
        .success()
        .stdout("sum: 55\n");
}

#[test]
fn reads_stdin_when_no_file_given() {
    things()
        .write_stdin("fmt.println(\"from stdin\")\n")
        .assert()
        .success()
        .stdout("from stdin\n");
}

#[test]
fn missing_file_exits_2() {
    things()
        .arg("does-not-exist.things")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn parse_errors_exit_3() {
    things()
        .args(["--eval", "var = 5"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "expected next token to be IDENT, got = instead",
        ));
}

#[test]
fn runtime_errors_exit_0_and_report() {
    things()
        .args(["--eval", "5 + true"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "ERROR: type mismatch: INTEGER + BOOLEAN",
        ));
}

#[test]
fn closures_end_to_end() {
    things()
        .args(["--eval", "newAdder := func(x) { func(y) { x + y } }; newAdder(2)(3)"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn tab_size_flag_is_accepted() {
    things()
        .args(["--tab-size", "8", "--eval", "\t1 + 1"])
        .assert()
        .success()
        .stdout("2\n");
}
