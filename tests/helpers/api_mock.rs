//! Mock GameHub API server for testing
//!
//! Wraps a wiremock server with the endpoints the catalog calls.

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use GameHub::config::ApiConfig;
use GameHub::services::HttpEventSource;
use GameHub::Settings;

pub struct GameHubMockServer {
    pub server: MockServer,
}

impl GameHubMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        let mut config = Settings::default().api;
        config.base_url = self.server.uri();
        config.timeout_seconds = 5;
        config
    }

    pub fn source(&self) -> HttpEventSource {
        HttpEventSource::new(&self.api_config()).expect("source should build")
    }

    pub fn source_with_token(&self, token: &str) -> HttpEventSource {
        let mut config = self.api_config();
        config.access_token = Some(token.to_string());
        HttpEventSource::new(&config).expect("source should build")
    }

    /// Source that counts registrations after each listing
    pub fn source_counting_registrations(&self) -> HttpEventSource {
        let mut config = self.api_config();
        config.count_registrations = true;
        HttpEventSource::new(&config).expect("source should build")
    }

    /// Serve `registrations` from `GET /events/{event_id}/registrations`
    pub async fn mock_registrations(&self, event_id: i64, registrations: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(format!("/events/{}/registrations", event_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(registrations)))
            .mount(&self.server)
            .await;
    }

    /// Serve `events` from `GET /events`
    pub async fn mock_list_events(&self, events: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(events)))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET {route}` with a bare status and body
    pub async fn mock_status(&self, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}
