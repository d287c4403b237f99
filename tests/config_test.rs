//! Configuration loading tests
//!
//! These touch process environment variables, so they run serially.

use std::io::Write;
use assert_matches::assert_matches;
use serial_test::serial;
use tokio_test::{assert_err, assert_ok};
use GameHub::{GameHubError, Settings};

const ENV_PAGE_SIZE: &str = "GAMEHUB__CATALOG__PAGE_SIZE";
const ENV_BASE_URL: &str = "GAMEHUB__API__BASE_URL";

fn write_settings(settings: &Settings) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    let body = toml::to_string(settings).expect("settings serialize to toml");
    file.write_all(body.as_bytes()).expect("write config");
    file
}

fn clear_env() {
    std::env::remove_var(ENV_PAGE_SIZE);
    std::env::remove_var(ENV_BASE_URL);
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();
    let mut settings = Settings::default();
    settings.api.base_url = "https://api.gamehub.test".to_string();
    settings.api.access_token = Some("organizer-token".to_string());
    settings.api.count_registrations = true;
    settings.catalog.page_size = 24;
    let file = write_settings(&settings);

    let loaded = Settings::load_from(file.path()).unwrap();
    assert_eq!(loaded.api.base_url, "https://api.gamehub.test");
    assert_eq!(loaded.api.access_token.as_deref(), Some("organizer-token"));
    assert!(loaded.api.count_registrations);
    assert_eq!(loaded.catalog.page_size, 24);
    assert_eq!(loaded.logging.level, "info");
    assert_ok!(loaded.validate());
}

#[test]
#[serial]
fn test_missing_sections_fall_back_to_defaults() {
    clear_env();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[api]\nbase_url = \"http://localhost:8000\"\ntimeout_seconds = 5").unwrap();

    let loaded = Settings::load_from(file.path()).unwrap();
    assert_eq!(loaded.catalog.page_size, 12);
    assert_eq!(loaded.catalog.search_debounce_ms, 300);
    assert!(loaded.logging.file_path.is_none());
    assert!(!loaded.api.count_registrations);
    assert!(loaded.api.user_agent.starts_with("GameHub-Catalog/"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let file = write_settings(&Settings::default());
    std::env::set_var(ENV_PAGE_SIZE, "30");
    std::env::set_var(ENV_BASE_URL, "https://staging.gamehub.test");

    let loaded = Settings::load_from(file.path());
    clear_env();

    let loaded = loaded.unwrap();
    assert_eq!(loaded.catalog.page_size, 30);
    assert_eq!(loaded.api.base_url, "https://staging.gamehub.test");
}

#[test]
#[serial]
fn test_invalid_file_values_fail_validation() {
    clear_env();
    let mut settings = Settings::default();
    settings.api.base_url = "ftp://files.gamehub.test".to_string();
    let file = write_settings(&settings);

    let loaded = Settings::load_from(file.path()).unwrap();
    let err = assert_err!(loaded.validate());
    assert_matches!(err, GameHubError::Config(msg) if msg.contains("ftp"));
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    assert!(Settings::load_from(dir.path().join("absent.toml")).is_err());
}
