//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the GameHub catalog.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::LoggingConfig;
use crate::models::event::EventId;
use crate::utils::errors::{GameHubError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop, so the caller must keep
/// it alive for the lifetime of the program.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| GameHubError::Config(format!("Invalid log filter: {}", e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "gamehub.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| GameHubError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of a catalog load
pub fn log_catalog_load(fetched: usize, total: usize, matching: usize, append: bool) {
    info!(
        fetched = fetched,
        total = total,
        matching = matching,
        append = append,
        "Catalog loaded"
    );
}

/// Log a record the catalog cannot compute capacity figures for
pub fn log_malformed_record(event_id: &EventId, field: &str, value: i64) {
    warn!(
        event_id = %event_id,
        field = field,
        value = value,
        "Malformed event record"
    );
}

/// Log a load whose result arrived after a newer load was issued
pub fn log_stale_load(generation: u64, latest: u64) {
    debug!(
        generation = generation,
        latest = latest,
        "Discarding superseded catalog load"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}
