use notegraph_core::config::loader::ConfigLoader;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn load_default_profile_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/vault"
excluded_folders = ["templates", "{{vault_root}}/archive"]

[logging]
level = "debug"
file = "{{vault_root}}/.notegraph.log"

[search]
max_results = 7

[watch]
debounce_ms = 40
"#;

    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), None).expect("should load");
    assert_eq!(rc.active_profile, "default");
    assert_eq!(rc.vault_root.display().to_string(), "/tmp/vault");
    assert_eq!(
        rc.excluded_folders,
        vec![PathBuf::from("templates"), PathBuf::from("/tmp/vault/archive")]
    );
    assert_eq!(rc.logging.level, "debug");
    assert_eq!(rc.logging.file, Some(PathBuf::from("/tmp/vault/.notegraph.log")));
    assert_eq!(rc.search.max_results, 7);
    assert_eq!(rc.watch.debounce_ms, 40);
}

#[test]
fn defaults_for_optional_sections() {
    let rc = ConfigLoader::load_str(
        "version = 1\n[profiles.default]\nvault_root = \"/v\"\n",
        "inline",
        None,
    )
    .expect("should load");

    assert_eq!(rc.active_profile, "default");
    assert!(rc.excluded_folders.is_empty());
    assert_eq!(rc.logging.level, "info");
    assert!(rc.logging.file.is_none());
    assert_eq!(rc.search.max_results, 50);
    assert_eq!(rc.watch.debounce_ms, 250);
}

#[test]
fn load_with_profile_override_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("notegraph/config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/def"

[profiles.work]
vault_root = "/tmp/work"
"#;
    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), Some("work")).expect("should load");
    assert_eq!(rc.active_profile, "work");
    assert_eq!(rc.vault_root.display().to_string(), "/tmp/work");
}

#[test]
fn tilde_expands_to_home() {
    let Some(home) = dirs::home_dir() else { return };
    let rc = ConfigLoader::load_str(
        "version = 1\n[profiles.default]\nvault_root = \"~/notes\"\n",
        "inline",
        None,
    )
    .expect("should load");
    assert_eq!(rc.vault_root, home.join("notes"));
}
