//! Scripted in-memory provider shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::time::Instant;

use crate::error::GeoError;
use crate::provider::{Candidate, GeocodingProvider};

#[derive(Default)]
pub(crate) struct FakeProvider {
    responses: HashMap<String, Vec<Candidate>>,
    failing: Vec<String>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `candidates`. Unscripted queries get no candidates.
    pub(crate) fn respond(mut self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.responses.insert(query.to_string(), candidates);
        self
    }

    /// Answer `query` with a single candidate at `(lat, lon)`.
    pub(crate) fn hit(self, query: &str, lat: f64, lon: f64) -> Self {
        let candidate = Candidate::new(&lat.to_string(), &lon.to_string(), query, Some(0.5));
        self.respond(query, vec![candidate])
    }

    /// Fail `query` with a transport-style error.
    pub(crate) fn fail(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }

    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

impl GeocodingProvider for FakeProvider {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, GeoError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), Instant::now()));
        if self.failing.iter().any(|q| q == query) {
            return Err(GeoError::UnexpectedStatus {
                status: 503,
                url: format!("fake://search?q={query}"),
            });
        }
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}
