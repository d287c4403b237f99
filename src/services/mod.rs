//! Services module
//!
//! This module contains the catalog engine and the services feeding it

pub mod catalog;
pub mod debounce;
pub mod source;

// Re-export commonly used services
pub use catalog::{EventCatalog, CatalogService, CatalogSummary, LoadOutcome, DEFAULT_PAGE_SIZE};
pub use debounce::Debouncer;
pub use source::{EventSource, HttpEventSource};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory wiring the catalog to the configured API
#[derive(Clone)]
pub struct ServiceFactory {
    pub catalog: Arc<CatalogService<HttpEventSource>>,
    pub source: HttpEventSource,
    pub search_debouncer: Arc<Debouncer>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings) -> Result<Self> {
        let source = HttpEventSource::new(&settings.api)?;
        let catalog = CatalogService::new(source.clone(), EventCatalog::from_config(&settings.catalog));
        let search_debouncer = Debouncer::from_config(&settings.catalog);

        Ok(Self {
            catalog: Arc::new(catalog),
            source,
            search_debouncer: Arc::new(search_debouncer),
        })
    }
}
