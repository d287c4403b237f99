//! In-memory event source with scripted responses
//!
//! Each `fetch_events` call consumes the next scripted response. Gated
//! responses stay pending until the returned sender fires, which lets tests
//! hold one load in flight while issuing another.

use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use tokio::sync::oneshot;
use GameHub::models::{EventRecord, FilterCriteria};
use GameHub::services::EventSource;
use GameHub::utils::{FetchError, FetchResult};

struct Scripted {
    result: FetchResult<Vec<EventRecord>>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct ScriptedEventSource {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<FilterCriteria>>,
}

impl ScriptedEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: FetchResult<Vec<EventRecord>>) {
        self.responses.lock().unwrap().push_back(Scripted { result, gate: None });
    }

    /// Queue a response that is held back until the sender fires
    pub fn push_gated(&self, result: FetchResult<Vec<EventRecord>>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted { result, gate: Some(rx) });
        tx
    }

    /// Criteria of every fetch so far
    pub fn requests(&self) -> Vec<FilterCriteria> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSource for ScriptedEventSource {
    async fn fetch_events(&self, criteria: &FilterCriteria) -> FetchResult<Vec<EventRecord>> {
        self.requests.lock().unwrap().push(criteria.clone());
        let next = self.responses.lock().unwrap().pop_front();

        match next {
            Some(Scripted { result, gate }) => {
                if let Some(gate) = gate {
                    gate.await
                        .map_err(|_| FetchError::RequestFailed("gate dropped".to_string()))?;
                }
                result
            }
            None => Ok(Vec::new()),
        }
    }
}
