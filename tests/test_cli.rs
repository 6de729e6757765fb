//! Tests for the command line interface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn treeweave() -> Command {
    Command::cargo_bin("treeweave").unwrap()
}

fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_prints_both_traversals() {
    let file = input_file("3 right\n1 2 3 root\n2 left\n");
    treeweave()
        .arg("-f")
        .arg(file.path())
        .assert()
        .success()
        .stdout("root left right \nleft root right \n");
}

#[test]
fn test_incomplete_flag() {
    let file = input_file("1 2 root\n2 only child\n");
    treeweave()
        .arg("-f")
        .arg(file.path())
        .arg("-i")
        .assert()
        .success()
        .stdout("root only child \nonly child root \n");

    // Without -i, "2 root" is the label and "2 only child" is left over
    treeweave()
        .arg("-f")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete tree"));
}

#[test]
fn test_duplicate_ids_flag() {
    let file = input_file("1 3 3 root\n3 a\n3 b\n");
    treeweave()
        .args(["-d", "-f"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("root a b \na root b \n");

    treeweave()
        .arg("-f")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicting identifier 3"));
}

#[test]
fn test_missing_file_argument() {
    treeweave()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_help_exits_non_zero() {
    treeweave()
        .arg("-h")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_flag() {
    treeweave()
        .args(["-f", "x.txt", "--bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_not_accessible() {
    let dir = tempfile::tempdir().unwrap();
    treeweave()
        .arg("-f")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("not a regular file"));
}

#[test]
fn test_max_file_size() {
    let file = input_file("1 2 3 root\n2 left\n3 right\n");
    treeweave()
        .arg("-f")
        .arg(file.path())
        .args(["--max-file-size", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input too large"));
}

#[test]
fn test_skipped_line_logged_to_stderr() {
    let file = input_file("1 2 3 root\nbad line\n2 left\n3 right\n");
    treeweave()
        .arg("-f")
        .arg(file.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout("root left right \nleft root right \n")
        .stderr(predicate::str::contains("Skipping line 2"));
}
