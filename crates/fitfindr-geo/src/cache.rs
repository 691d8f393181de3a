use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use crate::error::GeoError;
use crate::provider::{Candidate, GeocodingProvider};

type Entries = LruCache<String, (Instant, Vec<Candidate>)>;

/// Bounded TTL cache in front of any [`GeocodingProvider`].
///
/// Keys are the exact query strings handed to the provider. Only successful
/// responses (including empty ones) are stored; errors always pass through.
/// A zero TTL disables caching.
///
/// At most `capacity` queries are held; the least recently used one is
/// dropped to make room. Expired entries at the cold end are swept on every
/// insert, and an expired entry found by lookup is removed.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<Entries>,
}

impl<P> CachedProvider<P> {
    #[must_use]
    pub fn new(inner: P, ttl: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of stored entries, expired ones not yet swept included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, stored_at: Instant) -> bool {
        stored_at.elapsed() < self.ttl
    }

    fn lookup(&self, query: &str) -> Option<Vec<Candidate>> {
        let mut entries = self.lock();
        let hit = entries
            .get(query)
            .filter(|(stored_at, _)| self.is_fresh(*stored_at))
            .map(|(_, candidates)| candidates.clone());
        if hit.is_none() {
            entries.pop(query);
        }
        hit
    }

    fn remember(&self, query: &str, candidates: Vec<Candidate>) {
        let mut entries = self.lock();
        while entries
            .peek_lru()
            .is_some_and(|(_, (stored_at, _))| !self.is_fresh(*stored_at))
        {
            entries.pop_lru();
        }
        entries.put(query.to_string(), (Instant::now(), candidates));
    }
}

impl<P: GeocodingProvider> GeocodingProvider for CachedProvider<P> {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, GeoError> {
        if self.ttl.is_zero() {
            return self.inner.search(query).await;
        }

        if let Some(hit) = self.lookup(query) {
            tracing::debug!(query, "geocoder cache hit");
            return Ok(hit);
        }

        let candidates = self.inner.search(query).await?;
        self.remember(query, candidates.clone());
        Ok(candidates)
    }
}
