use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use velorank_core::ResultSet;

use crate::store::KeyValueStore;

/// Prefix shared by every key this crate writes, so the sweep can find its
/// own entries without touching unrelated keys in a shared store.
const CACHE_PREFIX: &str = "velorank:";

/// The single well-known key holding the last computed result set.
pub const RESULT_KEY: &str = "velorank:top-riders:v1";

/// JSON wire format: the serialized result set plus its write timestamp.
/// The store is text-only, so the timestamps are restored on read.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CachedPayload {
    pub stored_at: DateTime<Utc>,
    pub result: ResultSet,
}

/// Owns at most one `ResultSet` at a time under [`RESULT_KEY`], last write
/// wins. Reads lazily evict entries older than the expiry window; a periodic
/// [`sweep`](ResultCache::sweep) evicts proactively as an optimization.
pub struct ResultCache<S: KeyValueStore> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> ResultCache<S> {
    /// A cache over `store` whose entries expire after `ttl`.
    pub fn new(store: S, ttl: std::time::Duration) -> Self {
        Self {
            store,
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::minutes(10)),
        }
    }

    /// Store `result` with the current timestamp, overwriting any previous
    /// value. Store failures are logged and swallowed.
    pub fn set(&self, result: &ResultSet) {
        self.set_at(result, Utc::now());
    }

    pub(crate) fn set_at(&self, result: &ResultSet, stored_at: DateTime<Utc>) {
        let payload = CachedPayload {
            stored_at,
            result: result.clone(),
        };
        let json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize cached results");
                return;
            }
        };
        if let Err(err) = self.store.set(RESULT_KEY, &json) {
            tracing::warn!(error = %err, "cache write failed");
        }
    }

    /// Read the stored result set. Expired or unreadable entries are removed
    /// and reported as a miss.
    pub fn get(&self) -> Option<ResultSet> {
        let json = match self.store.get(RESULT_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(err) => {
                tracing::debug!(error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match self.parse_fresh(&json) {
            Some(payload) => Some(payload.result),
            None => {
                let _ = self.store.remove(RESULT_KEY);
                None
            }
        }
    }

    /// Scan all cache-prefixed keys and evict expired or corrupt payloads.
    /// Purely an optimization: `get` self-evicts regardless.
    pub fn sweep(&self) {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(err) => {
                tracing::debug!(error = %err, "cache sweep skipped");
                return;
            }
        };

        for key in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
            let stale = match self.store.get(key) {
                Ok(Some(json)) => self.parse_fresh(&json).is_none(),
                Ok(None) => false,
                Err(_) => false,
            };
            if stale {
                tracing::debug!(key = %key, "evicting expired cache entry");
                let _ = self.store.remove(key);
            }
        }
    }

    /// Parse a payload and return it only while still inside the expiry
    /// window.
    fn parse_fresh(&self, json: &str) -> Option<CachedPayload> {
        let payload: CachedPayload = serde_json::from_str(json).ok()?;
        if Utc::now() - payload.stored_at > self.ttl {
            return None;
        }
        Some(payload)
    }
}
