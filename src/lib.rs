//! GameHub event catalog
//!
//! Client-side engine behind the GameHub tournament listing. It fetches events
//! from the GameHub REST API, filters and sorts them by user criteria, and
//! serves a growing, prefix-paginated view to whatever renders it.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GameHubError, FetchError, Result};

// Re-export main components for easy access
pub use models::{EventRecord, EventId, EventStatus, FilterCriteria, DateBucket, Availability, SortKey};
pub use services::{EventCatalog, CatalogService, EventSource, HttpEventSource, Debouncer, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
