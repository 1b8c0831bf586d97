use std::fs;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn watch_reports_edited_notes() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("Alpha.md"), "# Alpha\n").unwrap();
    fs::write(vault.join("Journal.md"), "empty\n").unwrap();

    let cfg = tmp.path().join("config.toml");
    fs::write(&cfg, format!("version = 1\n[profiles.default]\nvault_root = \"{}\"\n", vault.display()))
        .unwrap();

    let mut child = Command::new(assert_cmd::cargo::cargo_bin!("ngr"))
        .arg("--config")
        .arg(&cfg)
        .args(["watch", "--debounce", "50", "--timeout", "5"])
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    // Keep editing until the watcher has certainly started.
    for i in 0..12 {
        thread::sleep(Duration::from_millis(300));
        fs::write(vault.join("Journal.md"), format!("edit {i} mentions [[Alpha]] and [[Nowhere]]\n"))
            .unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Watching "), "{stdout}");
    assert!(stdout.contains("updated /Journal.md (unresolved: Nowhere)"), "{stdout}");
}
