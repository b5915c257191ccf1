//! Time-bounded response cache.
//!
//! Values are stored as `serde_json::Value` so a single cache can hold the
//! article list, assembled articles, search results and collections.
//! Entries expire a fixed TTL after they were written; an expired entry is
//! never returned.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Read-through cache keyed by request fingerprint.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, serde_json::Value>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache whose entries live for `ttl`. A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let mut builder = Cache::builder();
        if !ttl.is_zero() {
            builder = builder.time_to_live(ttl);
        }
        Self { entries: builder.build(), ttl }
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Deterministic fingerprint of an operation and its parameters.
    ///
    /// Structurally equal parameters always serialize identically, so they
    /// map to the same key.
    #[must_use]
    pub fn make_key<P: Serialize + ?Sized>(operation: &str, params: &P) -> String {
        use md5::{Digest, Md5};

        let serialized = serde_json::to_vec(params).unwrap_or_default();

        let mut hasher = Md5::new();
        hasher.update(operation.as_bytes());
        hasher.update(b"|");
        hasher.update(&serialized);

        format!("{operation}:{:x}", hasher.finalize())
    }

    /// Look up a live entry.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if self.ttl.is_zero() {
            return None;
        }

        let value = self.entries.get(key).await?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "Dropping cache entry with unexpected shape");
                self.entries.invalidate(key).await;
                None
            }
        }
    }

    /// Store `value` under `key`, expiring one TTL from now.
    pub async fn set<T: Serialize>(&self, key: impl Into<String>, value: &T) {
        if self.ttl.is_zero() {
            return;
        }

        let key = key.into();
        match serde_json::to_value(value) {
            Ok(v) => self.entries.insert(key, v).await,
            Err(e) => tracing::warn!(key, error = %e, "Value not cacheable"),
        }
    }

    /// Return the cached value for `key`, or run `compute` and cache its result.
    ///
    /// Errors are passed through and never cached. Two concurrent misses on
    /// the same key may both compute; the later write wins.
    pub async fn memoize<T, E, F, Fut>(&self, key: String, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(&key).await {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(hit);
        }

        tracing::debug!(key = %key, "Cache miss");
        let value = compute().await?;
        self.set(key, &value).await;
        Ok(value)
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache").field("ttl", &self.ttl).finish()
    }
}
