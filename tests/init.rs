use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fresco"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "fresco init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".fresco.toml");
    assert!(config_path.exists(), ".fresco.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[generation]"));
    assert!(content.contains("[openai]"));

    // Verify it's valid TOML that fresco-core can parse
    let config: fresco_core::FrescoConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.generation.theme, "wizard adventure");
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".fresco.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fresco"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn run_without_pr_or_key_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fresco"))
        .arg("run")
        .current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("PULL_REQUEST_NUMBER")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
