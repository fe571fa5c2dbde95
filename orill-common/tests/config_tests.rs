//! Tests for configuration loading and root folder resolution
//!
//! Uses serial_test to prevent environment variable races: every test that touches
//! ORILL_ROOT_FOLDER or ORILL_DB_PATH is marked #[serial].

use orill_common::config::{
    default_root_folder, RootFolderInitializer, RootFolderResolver, TomlConfig, DATABASE_FILE,
    DB_PATH_ENV, ROOT_FOLDER_ENV,
};
use orill_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new().resolve();

    assert!(!root_folder.as_os_str().is_empty());
    assert_eq!(root_folder, default_root_folder());
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/orill-test-env-folder");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/orill-test-toml-folder")),
        ..TomlConfig::default()
    };

    let root_folder = RootFolderResolver::new().with_toml(&config).resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/orill-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/orill-test-toml-folder")),
        ..TomlConfig::default()
    };

    let root_folder = RootFolderResolver::new().with_toml(&config).resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/orill-test-toml-folder"));
}

#[test]
#[serial]
fn test_initializer_database_path() {
    env::remove_var(DB_PATH_ENV);
    let root = PathBuf::from("/tmp/orill-test-root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert_eq!(initializer.database_path(), root.join(DATABASE_FILE));
}

#[test]
#[serial]
fn test_initializer_database_path_env_override() {
    env::set_var(DB_PATH_ENV, "/tmp/orill-elsewhere.db");
    let initializer = RootFolderInitializer::new(PathBuf::from("/tmp/orill-test-root"));

    assert_eq!(
        initializer.database_path(),
        PathBuf::from("/tmp/orill-elsewhere.db")
    );

    env::remove_var(DB_PATH_ENV);
}

#[test]
fn test_initializer_creates_directory_idempotently() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("orill-root");

    let initializer = RootFolderInitializer::new(root.clone());
    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(initializer.ensure_directory_exists().is_ok());

    assert!(root.is_dir(), "Directory was not created");
}

#[test]
fn test_load_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
port = 5999
analyzers = ["adapt"]
guardrail_layers = ["CDIL"]

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.port, 5999);
    assert_eq!(config.analyzers, vec!["adapt"]);
    assert_eq!(config.guardrail_layers, vec!["CDIL"]);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = TomlConfig::load_or_default(Some(&temp_dir.path().join("absent.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let result = TomlConfig::load(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}
