//! Tests for config module

use esframes::config::{expand_tilde, Config};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.highlight.pre_tag, "@HIGHLIGHT@");
    assert_eq!(config.highlight.post_tag, "@/HIGHLIGHT@");
    assert_eq!(config.logs.time_field, "@timestamp");
    assert!(config.logs.message_field.is_none());
    assert_eq!(config.client.base_url, "http://localhost:9200");
    assert_eq!(config.client.timeout_ms, 30000);
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn test_expand_tilde() {
    let home = dirs::home_dir().unwrap();

    let expanded = expand_tilde(&PathBuf::from("~/foo")).unwrap();
    assert_eq!(expanded, home.join("foo"));

    let expanded = expand_tilde(&PathBuf::from("~")).unwrap();
    assert_eq!(expanded, home);

    let expanded = expand_tilde(&PathBuf::from("/absolute/path")).unwrap();
    assert_eq!(expanded, PathBuf::from("/absolute/path"));
}

#[test]
fn test_save_and_load() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");

    let mut config = Config::default();
    config.logs.message_field = Some("message".to_string());
    config.logs.level_field = Some("severity".to_string());
    config.client.base_url = "https://search.internal:9243".to_string();
    config.logging.format = "json".to_string();
    config.save(&config_path).unwrap();

    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded.logs.message_field.as_deref(), Some("message"));
    assert_eq!(loaded.logs.level_field.as_deref(), Some("severity"));
    assert_eq!(loaded.client.base_url, "https://search.internal:9243");
    assert_eq!(loaded.logging.format, "json");
}

#[test]
fn test_load_or_create_writes_default() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("nested").join("config.toml");

    let config = Config::load_or_create(&config_path).unwrap();
    assert_eq!(config.logs.time_field, "@timestamp");
    assert!(config_path.exists());
}

#[test]
fn test_partial_config_uses_defaults() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[logs]
time_field = "ts"

[highlight]
pre_tag = "<em>"
"#,
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.logs.time_field, "ts");
    assert_eq!(config.highlight.pre_tag, "<em>");
    assert_eq!(config.highlight.post_tag, "@/HIGHLIGHT@");
    assert_eq!(config.client.timeout_ms, 30000);
}

#[test]
fn test_empty_time_field_rejected() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(&config_path, "[logs]\ntime_field = \"\"\n").unwrap();

    assert!(Config::load(&config_path).is_err());
}
