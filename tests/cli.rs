//! Runs the `depsweep` binary and checks what it prints.

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("depsweep").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn site_packages(dir: &TempDir) -> String {
    let site = dir.path().join("site-packages");
    let rich = site.join("rich-13.7.0.dist-info");
    fs::create_dir_all(&rich).unwrap();
    fs::write(rich.join("top_level.txt"), "rich\n").unwrap();
    site.display().to_string()
}

#[test]
fn test_missing_source_prints_message_and_fails() {
    let dir = TempDir::new().unwrap();
    let site = site_packages(&dir);
    let missing = dir.path().join("gone.py");

    cmd(&dir)
        .args(["--site-packages", &site, "-f"])
        .arg(&missing)
        .assert()
        .code(1)
        .stdout(format!(
            "No such file: {}\nCLI interrupted!\n",
            missing.display()
        ));
}

#[test]
fn test_unused_package_is_reported() {
    let dir = TempDir::new().unwrap();
    let site = site_packages(&dir);
    let main = dir.path().join("main.py");
    fs::write(&main, "import os\n").unwrap();

    cmd(&dir)
        .args(["--site-packages", &site, "-f"])
        .arg(&main)
        .assert()
        .success()
        .stdout(contains("'rich' is probably unused."));
}
