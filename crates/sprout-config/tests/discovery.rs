//! Tests for locating and loading the project configuration.

use sprout_config::{ConfigDiscovery, ConfigError, ConfigValidator, FsValidator, RuleSpec};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn find_returns_none_when_no_config() {
    let dir = TempDir::new().expect("tempdir");
    assert!(ConfigDiscovery::new(dir.path()).find().is_none());
}

#[test]
fn load_returns_not_found_when_no_config() {
    let dir = TempDir::new().expect("tempdir");
    let result = ConfigDiscovery::new(dir.path()).load();
    assert!(matches!(result, Err(ConfigError::NotFound)));
}

#[test]
fn load_or_default_falls_back_to_application_config() {
    let dir = TempDir::new().expect("tempdir");
    let config = ConfigDiscovery::new(dir.path())
        .load_or_default()
        .expect("defaults");
    assert_eq!(config.rules, sprout_config::application_rules());
}

#[test]
fn toml_config_is_preferred_over_package_json() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("sprout.toml"),
        r#"
lint_on_save = false

[[rules]]
kind = "alias"
prefix = "@views"
target = "app/views"
"#,
    )
    .expect("write toml");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "demo", "sprout": { "lint_on_save": true } }"#,
    )
    .expect("write package.json");

    let discovery = ConfigDiscovery::new(dir.path());
    assert_eq!(discovery.find().unwrap(), dir.path().join("sprout.toml"));

    let config = discovery.load().expect("load");
    assert!(!config.lint_on_save);
    assert_eq!(config.rules.len(), 1);
    let rules = config.rule_set(dir.path()).expect("rules");
    assert_eq!(
        rules.aliases.resolve("@views/hello").unwrap(),
        dir.path().join("app/views/hello")
    );
}

#[test]
fn load_from_package_json_field() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "demo",
            "sprout": {
                "icon_dir": "src/icons",
                "rules": [
                    { "kind": "cache-group", "name": "chunk-libs", "test": "node_modules", "priority": 10 }
                ]
            }
        }"#,
    )
    .expect("write package.json");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert_eq!(config.icon_dir, PathBuf::from("src/icons"));
    assert!(matches!(&config.rules[0], RuleSpec::CacheGroup(g) if g.name == "chunk-libs"));
}

#[test]
fn package_json_without_field_is_not_a_config() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("package.json"), r#"{ "name": "demo" }"#).expect("write");
    assert!(ConfigDiscovery::new(dir.path()).find().is_none());
}

#[test]
fn invalid_toml_reports_value_error() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("sprout.toml"), "rules = [").expect("write");
    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn fs_validator_requires_entry_modules() {
    let dir = TempDir::new().expect("tempdir");
    let config = sprout_config::SproutConfig::default();
    let err = FsValidator::new(dir.path()).validate(&config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "entries"));

    fs::create_dir_all(dir.path().join("src/assets/styles")).expect("mkdir");
    fs::write(dir.path().join("src/main.js"), "import App from '@/App'").expect("write");
    fs::write(dir.path().join("src/assets/styles/variables.less"), "@primary: #1989fa;")
        .expect("write");
    FsValidator::new(dir.path())
        .validate(&config)
        .expect("valid project");
}
