// CLI regression tests. Requires: assert_cmd, predicates crates in [dev-dependencies]

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{failing_page, manifest_dir, pages_dir};

fn tablefit() -> Command {
    let mut cmd = Command::cargo_bin("tablefit").unwrap();
    cmd.current_dir(manifest_dir()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn name_prints_parts() {
    tablefit()
        .args(["name", "System.Text.StringBuilder"])
        .assert()
        .success()
        .stdout(
            contains("StringBuilder")
                .and(contains("System.Text"))
                .and(contains("yes")),
        );
}

#[test]
fn name_json_for_degenerate_input() {
    let output = tablefit().args(["name", "a..b", "--json"]).output().unwrap();
    assert!(output.status.success());
    let parts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parts["short_name"], "b");
    assert_eq!(parts["namespace"], "a.");
    assert_eq!(parts["fully_qualified"], false);
}

#[test]
fn run_passing_page() {
    tablefit()
        .arg("run")
        .arg(pages_dir().join("MusicDisplay.fit"))
        .assert()
        .success()
        .stdout(contains("24 right, 0 wrong, 0 ignored, 0 exceptions"));
}

#[test]
fn run_failing_page_reports_miette_diagnostics() {
    tablefit()
        .arg("run")
        .arg(failing_page("Broken.fit"))
        .assert()
        .code(1)
        .stdout(contains("1 right, 7 wrong"))
        .stderr(
            contains("tablefit::fixture")
                .and(contains("Could not find fixture: eg.music.Playlist."))
                .and(contains("Extra table cells")),
        );
}

#[test]
fn short_name_resolves_with_import_flag() {
    let dir = manifest_dir().join("target").join("cli-import-flag");
    fs::create_dir_all(&dir).unwrap();
    let page = dir.join("ImportFlag.fit");
    fs::write(&page, "|Display|\n|artist|\n|Eagles|\n").unwrap();

    // Only Eagles is listed, so the other songs are surplus, but the table ran.
    tablefit()
        .args(["--import", "eg.music", "run"])
        .arg(&page)
        .assert()
        .code(1)
        .stdout(contains("1 right, 5 wrong, 0 ignored, 0 exceptions"));
}

#[test]
fn test_command_runs_sample_pages() {
    tablefit()
        .arg("test")
        .assert()
        .success()
        .stdout(contains("Found 2 page(s)").and(contains("2/2 pages passed")));
}

#[test]
fn test_command_honours_config_extensions() {
    let dir = manifest_dir().join("target").join("cli-config-test");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("tablefit.yaml"), "imports: [eg.music]\nextensions: [page]\n").unwrap();
    fs::write(dir.join("One.page"), "|Display|\n|title|\n|Akila|\n|Agnus Dei|\n|Blue Monday|\n|Hotel California|\n|So What|\n|Take Five|\n").unwrap();
    fs::write(dir.join("Ignored.fit"), "|Nope|\n|x|\n").unwrap();

    tablefit()
        .arg("--config")
        .arg(dir.join("tablefit.yaml"))
        .arg("test")
        .arg(&dir)
        .assert()
        .success()
        .stdout(contains("Found 1 page(s)").and(contains("6 right")));
}

#[test]
fn bad_config_is_reported() {
    let dir = manifest_dir().join("target").join("cli-bad-config");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("bad.yaml"), "imports: ['not a namespace']\n").unwrap();

    tablefit()
        .arg("--config")
        .arg(dir.join("bad.yaml"))
        .arg("list-fixtures")
        .assert()
        .code(2)
        .stderr(contains("not a dotted namespace"));
}

#[test]
fn list_fixtures() {
    tablefit()
        .arg("list-fixtures")
        .assert()
        .success()
        .stdout(contains("eg.music.Display"));
}
