//! Hand-written fakes for the search port.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use repodeck_core::{RepositorySummary, SearchError, SearchPort, SearchRequest};

type Response = Result<Vec<RepositorySummary>, SearchError>;

/// Search fake with per-query scripted responses and a call log.
#[derive(Default)]
pub struct ScriptedSearch {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<SearchRequest>>,
    latency: Duration,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn respond(&self, query: &str, response: Response) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), response);
    }

    pub fn calls(&self) -> Vec<SearchRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchPort for ScriptedSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RepositorySummary>, SearchError> {
        self.calls.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(&request.query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
