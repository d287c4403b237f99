//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use tracing_subscriber::EnvFilter;
use crate::utils::errors::{GameHubError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_catalog_config(&settings.catalog)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(GameHubError::Config(
            "API base URL is required".to_string()
        ));
    }

    let url = url::Url::parse(&config.base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GameHubError::Config(
            format!("API base URL must be http or https, got {}", url.scheme())
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(GameHubError::Config(
            "API timeout must be greater than 0".to_string()
        ));
    }

    if matches!(config.access_token.as_deref(), Some(token) if token.trim().is_empty()) {
        return Err(GameHubError::Config(
            "API access token must not be blank when set".to_string()
        ));
    }

    Ok(())
}

/// Validate catalog configuration
fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if config.page_size == 0 {
        return Err(GameHubError::Config(
            "Page size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GameHubError::Config(
            "Log level is required".to_string()
        ));
    }

    // Same parser init_logging uses, so full directives are accepted
    EnvFilter::try_new(&config.level).map_err(|e| {
        GameHubError::Config(format!("Invalid log filter {}: {}", config.level, e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_zero_page_size() {
        let mut settings = Settings::default();
        settings.catalog.page_size = 0;
        assert_matches!(validate_settings(&settings), Err(GameHubError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "not a url".to_string();
        assert_matches!(validate_settings(&settings), Err(GameHubError::UrlParse(_)));

        settings.api.base_url = "ftp://example.com".to_string();
        assert_matches!(validate_settings(&settings), Err(GameHubError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "GameHub=verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(GameHubError::Config(msg)) if msg.contains("GameHub=verbose"));
    }

    #[test]
    fn test_accepts_filter_directives() {
        let mut settings = Settings::default();
        for level in ["debug", "GameHub=debug,reqwest=warn", "info,GameHub::services=trace"] {
            settings.logging.level = level.to_string();
            assert!(validate_settings(&settings).is_ok(), "{} should be accepted", level);
        }
    }

    #[test]
    fn test_rejects_blank_token() {
        let mut settings = Settings::default();
        settings.api.access_token = Some("  ".to_string());
        assert!(validate_settings(&settings).is_err());
    }
}
