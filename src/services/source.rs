//! Event source implementations
//!
//! The catalog's only I/O boundary. [`HttpEventSource`] talks to the GameHub
//! REST API; anything else that can produce event records (fixtures, caches)
//! implements [`EventSource`] directly.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;
use crate::config::ApiConfig;
use crate::models::{count_registered, EventId, EventRecord, Feedback, FilterCriteria, Registration};
use crate::utils::errors::{FetchError, FetchResult, GameHubError, Result};
use crate::utils::helpers::generate_request_id;
use crate::utils::logging::log_api_error;

/// Something that can fetch event records.
///
/// Filters are forwarded as a hint only; the catalog re-applies every
/// criterion to whatever comes back.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, criteria: &FilterCriteria) -> FetchResult<Vec<EventRecord>>;
}

#[async_trait]
impl<S: EventSource + ?Sized> EventSource for Arc<S> {
    async fn fetch_events(&self, criteria: &FilterCriteria) -> FetchResult<Vec<EventRecord>> {
        (**self).fetch_events(criteria).await
    }
}

/// GameHub REST API client
#[derive(Debug, Clone)]
pub struct HttpEventSource {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
    count_registrations: bool,
}

impl HttpEventSource {
    /// Create a new HttpEventSource instance
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(GameHubError::Http)?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(GameHubError::Config(format!(
                "API base URL cannot carry paths: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
            count_registrations: config.count_registrations,
        })
    }

    /// Fetch a single event by id
    pub async fn fetch_event(&self, id: &EventId) -> FetchResult<EventRecord> {
        let id = id.to_string();
        let url = self.endpoint(&["events", id.as_str()])?;
        self.get_json(url, &[]).await
    }

    /// Events organized by the account behind the configured access token
    pub async fn fetch_my_events(&self) -> FetchResult<Vec<EventRecord>> {
        self.require_token("list organizer events")?;
        let url = self.endpoint(&["events", "my-events"])?;
        self.get_json(url, &[]).await
    }

    /// Every registration for one event, cancelled ones included
    pub async fn fetch_registrations(&self, id: &EventId) -> FetchResult<Vec<Registration>> {
        let id = id.to_string();
        let url = self.endpoint(&["events", id.as_str(), "registrations"])?;
        self.get_json(url, &[]).await
    }

    /// Registrations of the account behind the configured access token
    pub async fn fetch_my_registrations(&self) -> FetchResult<Vec<Registration>> {
        self.require_token("list registrations")?;
        let url = self.endpoint(&["registrations", "my-registrations"])?;
        self.get_json(url, &[]).await
    }

    /// Player feedback left on one event
    pub async fn fetch_feedback(&self, id: &EventId) -> FetchResult<Vec<Feedback>> {
        let id = id.to_string();
        let url = self.endpoint(&["events", id.as_str(), "feedback"])?;
        self.get_json(url, &[]).await
    }

    /// Set `registered_count` on each record from its registration list.
    ///
    /// Lists are fetched concurrently. A record whose list cannot be fetched
    /// keeps the count it arrived with.
    pub async fn fill_registered_counts(&self, records: &mut [EventRecord]) {
        let mut tasks = JoinSet::new();
        for (index, record) in records.iter().enumerate() {
            let source = self.clone();
            let id = record.id.clone();
            tasks.spawn(async move { (index, source.fetch_registrations(&id).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(registrations))) => {
                    records[index].registered_count = count_registered(&registrations);
                }
                Ok((index, Err(e))) => {
                    warn!(event_id = %records[index].id, error = %e, "Could not count registrations");
                }
                Err(e) => warn!(error = %e, "Registration count task failed"),
            }
        }
    }

    fn require_token(&self, action: &str) -> FetchResult<()> {
        if self.access_token.is_none() {
            return Err(FetchError::Unauthorized(format!(
                "an access token is required to {}",
                action
            )));
        }
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::RequestFailed(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> FetchResult<T> {
        let request_id = generate_request_id();
        debug!(url = %url, request_id = %request_id, "Making event API request");

        let mut request = self
            .client
            .get(url.clone())
            .header("X-Request-Id", request_id.as_str())
            .query(query);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            log_api_error("events", &e.to_string(), Some(url.path()));
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_connect() {
                FetchError::ServiceUnavailable
            } else {
                FetchError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log_api_error("events", &format!("HTTP {}", status), Some(url.path()));
            return Err(match status {
                StatusCode::NOT_FOUND => FetchError::NotFound(url.path().to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized(error_text),
                _ => FetchError::RequestFailed(format!("HTTP {}: {}", status, error_text)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_events(&self, criteria: &FilterCriteria) -> FetchResult<Vec<EventRecord>> {
        let url = self.endpoint(&["events"])?;
        let mut records: Vec<EventRecord> = self.get_json(url, &criteria.to_params()).await?;
        if self.count_registrations {
            self.fill_registered_counts(&mut records).await;
        }
        info!(count = records.len(), "Fetched events from API");
        Ok(records)
    }
}
