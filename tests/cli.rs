#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("permanence-cli").unwrap();
    cmd.env_remove("PERMANENCE_DB").arg("--db").arg(db);
    cmd
}

#[test]
fn init_generate_show() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("planning.db");

    cli(&db)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 staff member(s) added"));

    cli(&db)
        .args(["show", "--week", "2025-09-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Week not generated yet"));

    cli(&db)
        .args(["generate", "--week", "2025-09-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generated week of 2025-09-01: 14 assignment(s)",
        ));

    cli(&db)
        .args(["show", "--week", "2025-09-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2025-09-01 Mon | A: Nguyễn Tiến Phát",
        ))
        .stdout(predicate::str::contains("B: Trương Trọng Khang"));
}

#[test]
fn who_resolves_shift_number_and_relief() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("planning.db");
    cli(&db).arg("init").assert().success();
    cli(&db)
        .args(["generate", "--week", "2025-09-01"])
        .assert()
        .success();

    cli(&db)
        .args(["who", "--date", "2025-09-02", "--shift", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("On duty: Nguyễn Tiến Phát"))
        .stdout(predicate::str::contains("Relieved by: Nguyễn Sinh Trung"));

    cli(&db)
        .args(["who", "--date", "2025-09-06", "--shift", "4"])
        .assert()
        .failure();
}

#[test]
fn export_writes_requested_files() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("planning.db");
    let csv = dir.path().join("week.csv");
    cli(&db).arg("init").assert().success();
    cli(&db)
        .args(["generate", "--week", "2025-09-01"])
        .assert()
        .success();
    cli(&db)
        .args(["export", "--week", "2025-09-01", "--csv"])
        .arg(&csv)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&csv)
        .unwrap()
        .starts_with("date,weekday,group_a"));
}

#[test]
fn offset_reports_anchor_distance() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("planning.db");
    cli(&db).arg("init").assert().success();
    cli(&db)
        .args(["offset", "--date", "2025-08-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "week of 2025-08-25: -1 week(s) from anchor, offset 6 (ring of 7)",
        ));
}

#[test]
fn staff_rename_and_delete() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("planning.db");
    cli(&db).arg("init").assert().success();
    cli(&db)
        .args(["staff", "add", "--name", "Trần Văn Tạm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added staff 8"));

    cli(&db)
        .args(["staff", "rename", "--id", "8", "--name", "Trần Văn Bình"])
        .assert()
        .success();
    cli(&db)
        .args(["staff", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[8] Trần Văn Bình"));
    cli(&db)
        .args(["staff", "rename", "--id", "8", "--name", "  "])
        .assert()
        .failure();
    cli(&db)
        .args(["staff", "rename", "--id", "99", "--name", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown staff id: 99"));

    cli(&db)
        .args(["generate", "--week", "2025-09-01"])
        .assert()
        .success();
    cli(&db)
        .args(["staff", "delete", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still has assignments"));
    cli(&db)
        .args(["staff", "delete", "--id", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still has assignments"));

    cli(&db)
        .args(["clear", "--week", "2025-09-01"])
        .assert()
        .success();
    cli(&db)
        .args(["staff", "delete", "--id", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted staff 8"));
}
