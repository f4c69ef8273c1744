//! Tests for the `covconv` binary.
use assert_cmd::Command;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn covconv(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("covconv").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn converts_and_trims_prefix() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("cover.gocov"),
        "mode: set\ngithub.com/org/repo/a.go:1.1,2.1 1 1\n",
    )
    .unwrap();

    covconv(dir.path())
        .args(["--trim-prefix", "github.com/org/repo/", "cover.gocov", "out.json"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("out.json")).unwrap(),
        "{\n  \"coverage\": {\n    \"a.go\": {\n      \"1\": 1,\n      \"2\": 1\n    }\n  }\n}\n"
    );
}

#[test]
fn merges_multiple_inputs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("1.lcov"), "SF:a.c\nDA:1,1\nend_of_record\n").unwrap();
    fs::write(dir.path().join("2.lcov"), "SF:a.c\nDA:1,2\nDA:2,0\nend_of_record\n").unwrap();

    covconv(dir.path())
        .args(["1.lcov", "2.lcov", "merged.lcov"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("merged.lcov")).unwrap(),
        "SF:a.c\nDA:1,3\nDA:2,0\nLH:1\nLF:2\nend_of_record\n"
    );
}

#[test]
fn uses_config_file_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".covconv.toml"), "trim_prefix = \"/ci/\"\n").unwrap();
    fs::write(dir.path().join("in.lcov"), "SF:/ci/x.c\nDA:3,1\nend_of_record\n").unwrap();

    covconv(dir.path())
        .args(["in.lcov", "out.lcov"])
        .assert()
        .success();

    let out = fs::read_to_string(dir.path().join("out.lcov")).unwrap();
    assert!(out.starts_with("SF:x.c\n"), "{out}");
}

#[test]
fn failure_exits_with_status_2_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("in.lcov"), "SF:a.c\nDA:1,1\n").unwrap();

    let assert = covconv(dir.path())
        .args(["in.lcov", "out.json"])
        .assert()
        .code(2);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("Error:"), "{stderr}");
    assert!(stderr.contains("unfinished record"), "{stderr}");
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn unknown_output_extension_lists_supported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("in.lcov"), "").unwrap();

    let assert = covconv(dir.path())
        .args(["in.lcov", "out.txt"])
        .assert()
        .code(2);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains(".gocov, .lcov, .json"), "{stderr}");
}

#[test]
fn missing_arguments_is_usage_error() {
    let dir = TempDir::new().unwrap();
    covconv(dir.path()).arg("only.lcov").assert().failure().code(2);
}
