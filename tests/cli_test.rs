//! Binary smoke tests
//! Run with: cargo test --test cli_test

use std::process::Command;

fn wechatgpt() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wechatgpt"))
}

#[test]
fn test_version() {
    let output = wechatgpt().arg("version").output().expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("wechatgpt v"), "unexpected: {}", stdout);
}

#[test]
fn test_init_config_prints_yaml() {
    let output = wechatgpt().arg("init-config").output().expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let yaml = stdout.split("\nSave this").next().unwrap_or_default();
    let config: serde_yaml::Value = serde_yaml::from_str(yaml).expect("valid yaml");

    assert_eq!(config["bot"]["prefix"], serde_yaml::Value::from("/"));
    assert_eq!(config["llm"]["timeout-seconds"], serde_yaml::Value::from(60));
    assert_eq!(config["services"]["timeout-seconds"], serde_yaml::Value::from(15));
}

#[test]
fn test_run_without_api_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "bot:\n  prefix: /\n").unwrap();

    let output = wechatgpt()
        .args(["--config", config.to_str().unwrap(), "run"])
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let logs = String::from_utf8_lossy(&output.stdout);
    assert!(logs.contains("llm.api-key"), "unexpected: {}", logs);
}

#[test]
fn test_run_with_malformed_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "llm: [unclosed\n").unwrap();

    let output = wechatgpt()
        .args(["--config", config.to_str().unwrap(), "--api-key", "sk-test", "run"])
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let logs = String::from_utf8_lossy(&output.stdout);
    assert!(logs.contains("Failed to parse config"), "unexpected: {}", logs);
}
