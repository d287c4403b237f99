//! Event catalog engine
//!
//! [`EventCatalog`] owns the fetched records and the filtered, sorted view
//! derived from them. Pagination is prefix based: page `n` shows the first
//! `n * page_size` matching records, so "load more" only ever grows the list.
//!
//! [`CatalogService`] puts a catalog behind an async lock together with an
//! [`EventSource`] and sequences loads so that only the most recently issued
//! one is applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::debug;
use crate::config::CatalogConfig;
use crate::models::{EventId, EventRecord, FilterCriteria};
use crate::services::debounce::Debouncer;
use crate::services::source::EventSource;
use crate::utils::errors::Result;
use crate::utils::logging::{log_catalog_load, log_stale_load};

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Counts for a catalog header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub matching: usize,
    pub visible: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone)]
pub struct EventCatalog {
    all_records: Vec<EventRecord>,
    filtered_records: Vec<EventRecord>,
    criteria: FilterCriteria,
    current_page: usize,
    page_size: usize,
    /// Bumped on every criteria change
    revision: u64,
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl EventCatalog {
    /// A page size of zero is treated as one
    pub fn new(page_size: usize) -> Self {
        Self {
            all_records: Vec::new(),
            filtered_records: Vec::new(),
            criteria: FilterCriteria::default(),
            current_page: 1,
            page_size: page_size.max(1),
            revision: 0,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.page_size)
    }

    /// Replace the record set wholesale and recompute the view
    pub fn replace(&mut self, records: Vec<EventRecord>, criteria: FilterCriteria, now: DateTime<Utc>) {
        self.all_records = records;
        self.recompute(criteria, now);
    }

    /// Append records after the existing ones.
    ///
    /// The whole combined set is filtered and sorted again. The current page
    /// is kept when the criteria are unchanged so the visible list only grows;
    /// different criteria count as a filter change and reset it.
    pub fn append(&mut self, records: Vec<EventRecord>, criteria: FilterCriteria, now: DateTime<Utc>) {
        self.all_records.extend(records);
        if criteria == self.criteria {
            self.refresh(now);
        } else {
            self.recompute(criteria, now);
        }
    }

    /// Apply new criteria and go back to the first page
    pub fn recompute(&mut self, criteria: FilterCriteria, now: DateTime<Utc>) {
        self.criteria = criteria;
        self.revision += 1;
        self.current_page = 1;
        self.refresh(now);
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        let filter = self.criteria.prepare();
        let mut filtered: Vec<EventRecord> = self
            .all_records
            .iter()
            .filter(|record| filter.matches(record, now))
            .cloned()
            .collect();

        if let Some(sort_key) = self.criteria.sort_key {
            sort_key.sort(&mut filtered);
        }

        debug!(
            total = self.all_records.len(),
            matching = filtered.len(),
            page = self.current_page,
            "Catalog view recomputed"
        );
        self.filtered_records = filtered;
    }

    /// Prefix of the filtered records up to the current page; empty when
    /// nothing matches
    pub fn visible_page(&self) -> &[EventRecord] {
        let end = self
            .current_page
            .saturating_mul(self.page_size)
            .min(self.filtered_records.len());
        &self.filtered_records[..end]
    }

    /// Show one more page. Neither fetches nor re-filters.
    pub fn advance_page(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    pub fn has_more(&self) -> bool {
        self.filtered_records.len() > self.current_page.saturating_mul(self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_records.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_records.len().div_ceil(self.page_size)
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            total: self.all_records.len(),
            matching: self.filtered_records.len(),
            visible: self.visible_page().len(),
            current_page: self.current_page,
            total_pages: self.total_pages(),
        }
    }

    pub fn get(&self, id: &EventId) -> Option<&EventRecord> {
        self.all_records.iter().find(|record| &record.id == id)
    }

    pub fn all_records(&self) -> &[EventRecord] {
        &self.all_records
    }

    pub fn filtered_records(&self) -> &[EventRecord] {
        &self.filtered_records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Result of [`CatalogService::load`]
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Records were fetched and the view now reflects them
    Applied(Vec<EventRecord>),
    /// A newer load was issued while this one was in flight; the view was left alone
    Superseded(Vec<EventRecord>),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied(_))
    }

    pub fn records(&self) -> &[EventRecord] {
        match self {
            LoadOutcome::Applied(records) | LoadOutcome::Superseded(records) => records,
        }
    }
}

/// Shared catalog fed by an event source
pub struct CatalogService<S> {
    source: S,
    view: RwLock<EventCatalog>,
    latest_load: AtomicU64,
}

impl<S: EventSource> CatalogService<S> {
    pub fn new(source: S, catalog: EventCatalog) -> Self {
        Self {
            source,
            view: RwLock::new(catalog),
            latest_load: AtomicU64::new(0),
        }
    }

    /// Fetch records and fold them into the view.
    ///
    /// `criteria` of `None` keeps the active criteria. Readers keep seeing the
    /// previous view until the fetch resolves; the swap happens under the
    /// write lock. When another load is issued before this one resolves, this
    /// result is discarded. A filter change made while the fetch was in flight
    /// wins over the criteria this load was started with. On failure the view
    /// is left untouched.
    pub async fn load(
        &self,
        criteria: Option<FilterCriteria>,
        append: bool,
        now: DateTime<Utc>,
    ) -> Result<LoadOutcome> {
        let (generation, started_revision, requested) = {
            let view = self.view.read().await;
            let generation = self.latest_load.fetch_add(1, Ordering::SeqCst) + 1;
            let requested = criteria.unwrap_or_else(|| view.criteria().clone());
            (generation, view.revision(), requested)
        };

        let records = self.source.fetch_events(&requested).await?;

        let mut view = self.view.write().await;
        let latest = self.latest_load.load(Ordering::SeqCst);
        if latest != generation {
            log_stale_load(generation, latest);
            return Ok(LoadOutcome::Superseded(records));
        }

        let effective = if view.revision() == started_revision {
            requested
        } else {
            view.criteria().clone()
        };

        if append {
            view.append(records.clone(), effective, now);
        } else {
            view.replace(records.clone(), effective, now);
        }
        log_catalog_load(records.len(), view.all_records().len(), view.filtered_records().len(), append);

        Ok(LoadOutcome::Applied(records))
    }

    /// Apply new criteria to the records already loaded
    pub async fn refilter(&self, criteria: FilterCriteria, now: DateTime<Utc>) {
        self.view.write().await.recompute(criteria, now);
    }

    /// Replace only the free-text search, keeping every other criterion
    pub async fn search(&self, text: &str, now: DateTime<Utc>) {
        let mut view = self.view.write().await;
        let mut criteria = view.criteria().clone();
        criteria.search_text = Some(text.to_string());
        view.recompute(criteria, now);
    }

    pub async fn advance_page(&self) {
        self.view.write().await.advance_page();
    }

    pub async fn visible_page(&self) -> Vec<EventRecord> {
        self.view.read().await.visible_page().to_vec()
    }

    pub async fn has_more(&self) -> bool {
        self.view.read().await.has_more()
    }

    pub async fn summary(&self) -> CatalogSummary {
        self.view.read().await.summary()
    }

    /// Read access to the whole view
    pub async fn read(&self) -> RwLockReadGuard<'_, EventCatalog> {
        self.view.read().await
    }
}

impl<S: EventSource + 'static> CatalogService<S> {
    /// Run a search after the debouncer's quiet period; a newer call cancels
    /// this one. `clock` is read when the search fires, not when it is
    /// scheduled, so date buckets and statuses use the instant of the
    /// recompute.
    pub fn search_debounced<C>(self: &Arc<Self>, debouncer: &Debouncer, text: String, clock: C)
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let service = Arc::clone(self);
        debouncer.call(async move {
            service.search(&text, clock()).await;
        });
    }
}
