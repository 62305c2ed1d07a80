//! Contract tests for the `questions` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn questions() -> Command {
    Command::cargo_bin("questions").expect("binary built")
}

fn write_corpus(dir: &std::path::Path) {
    fs::write(dir.join("python.txt"), "Python is a programming language.\nGuido van Rossum created Python in 1991.").unwrap();
    fs::write(dir.join("dogs.txt"), "A dog is a loyal animal. Dogs bark at strangers.").unwrap();
}

#[test]
fn missing_corpus_prints_usage_and_fails() {
    questions()
        .arg("ask")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_subcommand_fails() {
    questions().assert().failure();
}

#[test]
fn ask_prints_best_sentence() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_corpus(tmp.path());

    questions()
        .args(["ask", tmp.path().to_str().unwrap(), "--query", "Who created Python?"])
        .assert()
        .success()
        .stdout("Guido van Rossum created Python in 1991.\n");
}

#[test]
fn ask_reads_query_from_stdin() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_corpus(tmp.path());

    questions()
        .args(["ask", tmp.path().to_str().unwrap()])
        .write_stdin("Why do dogs bark?\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Dogs bark at strangers.\n"));
}

#[test]
fn unreadable_corpus_fails_before_answering() {
    let tmp = tempfile::tempdir().expect("tempdir");
    questions()
        .args(["ask", tmp.path().join("missing").to_str().unwrap(), "--query", "dog"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("failed to load corpus"));
}

#[test]
fn build_then_ask_from_snapshot() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let corpus = tmp.path().join("corpus");
    let index = tmp.path().join("index");
    fs::create_dir(&corpus).unwrap();
    write_corpus(&corpus);

    questions()
        .args(["build", corpus.to_str().unwrap(), "--output", index.to_str().unwrap()])
        .assert()
        .success();
    assert!(index.join("meta.json").is_file());

    questions()
        .args(["ask", index.to_str().unwrap(), "-q", "loyal animal"])
        .assert()
        .success()
        .stdout("A dog is a loyal animal.\n");
}
