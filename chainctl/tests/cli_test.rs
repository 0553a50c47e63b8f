use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn chainctl(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chainctl").unwrap();
    cmd.env("NO_COLOR", "1").arg("--root").arg(root);
    cmd
}

#[test]
fn test_create_list_open() {
    let dir = tempdir().unwrap();

    chainctl(dir.path())
        .args(["create", "notes.txt", "hello world, this is a test of chunking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File created: notes.txt (39 characters)"));

    chainctl(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. notes.txt - 39 characters - Created: "));

    chainctl(dir.path())
        .args(["open", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Content:\nhello world, this is a test of chunking",
        ));

    assert!(dir.path().join("FAT/FAT.json").is_file());
    assert_eq!(std::fs::read_dir(dir.path().join("Data")).unwrap().count(), 2);
}

#[test]
fn test_delete_restore_cycle() {
    let dir = tempdir().unwrap();
    chainctl(dir.path()).args(["create", "a.txt", "alpha"]).assert().success();
    chainctl(dir.path()).args(["create", "b.txt", "bravo"]).assert().success();

    chainctl(dir.path())
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File moved to the recycle bin."));

    chainctl(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. b.txt").and(predicate::str::contains("a.txt").not()));

    chainctl(dir.path())
        .arg("recycled")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. a.txt - 5 characters - Deleted: "));

    chainctl(dir.path()).args(["restore", "1"]).assert().success();

    chainctl(dir.path())
        .arg("recycled")
        .assert()
        .success()
        .stdout(predicate::str::contains("The recycle bin is empty."));
}

#[test]
fn test_modify_and_check() {
    let dir = tempdir().unwrap();
    chainctl(dir.path())
        .args(["create", "a.txt", "first version, long enough for three blocks"])
        .assert()
        .success();

    chainctl(dir.path())
        .args(["modify", "1", "v2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Modifying file: a.txt"));

    chainctl(dir.path())
        .args(["open", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Content:\nv2\n"));

    chainctl(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("store is consistent (errors=0 warns=0)"));
}

#[test]
fn test_invalid_selection_fails() {
    let dir = tempdir().unwrap();
    chainctl(dir.path()).args(["create", "a.txt", "x"]).assert().success();

    chainctl(dir.path())
        .args(["open", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Selection out of range"));

    chainctl(dir.path())
        .args(["restore", "1"])
        .assert()
        .failure();

    chainctl(dir.path())
        .args(["open", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("listing numbers start at 1"));
}

#[test]
fn test_config_file_and_override() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("chainfat.toml"), "[store]\nblock_size = 5\n").unwrap();

    chainctl(dir.path())
        .args(["create", "a.txt", "0123456789"])
        .assert()
        .success();
    assert_eq!(std::fs::read_dir(dir.path().join("Data")).unwrap().count(), 2);

    chainctl(dir.path())
        .args(["--block-size", "10", "create", "b.txt", "0123456789"])
        .assert()
        .success();
    assert_eq!(std::fs::read_dir(dir.path().join("Data")).unwrap().count(), 3);
}

#[test]
fn test_shell_session() {
    let dir = tempdir().unwrap();
    chainctl(dir.path())
        .arg("shell")
        .write_stdin("1\nmenu.txt\nfrom the shell\n2\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("File created."))
        .stdout(predicate::str::contains("1. menu.txt - 14 characters"));

    chainctl(dir.path())
        .args(["open", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from the shell"));
}

#[test]
fn test_corrupt_table_is_reported() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("FAT")).unwrap();
    std::fs::write(dir.path().join("FAT/FAT.json"), "not json").unwrap();

    chainctl(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory snapshot is malformed"));
}
