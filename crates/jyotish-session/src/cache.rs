//! TTL-bound result cache with per-key single-flight computation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use jyotish_core::config::CacheConfig;
use jyotish_core::errors::JyotishResult;
use jyotish_core::models::{CacheMeta, PipelineResult};

struct Entry {
    result: Arc<PipelineResult>,
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
    access_count: u64,
    profile_id: String,
}

/// A cached result plus the bookkeeping for this access.
pub struct CachedResult {
    pub result: Arc<PipelineResult>,
    pub meta: CacheMeta,
}

/// Result cache keyed by canonical request hash.
///
/// Concurrent misses on the same key collapse into one computation: the
/// first caller computes while later ones wait on the key's flight lock
/// and then read the stored entry.
pub struct SessionCache {
    entries: DashMap<String, Entry>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// Look up a live entry, bumping its access bookkeeping.
    pub fn get(&self, hash: &str) -> Option<CachedResult> {
        let now = Utc::now();
        let mut entry = self.entries.get_mut(hash)?;
        if self.expired(&entry, now) {
            drop(entry);
            self.entries.remove(hash);
            debug!(hash, "cache entry expired");
            return None;
        }
        entry.access_count += 1;
        entry.last_accessed = now;
        Some(CachedResult {
            result: Arc::clone(&entry.result),
            meta: CacheMeta {
                cache_hit: true,
                access_count: entry.access_count,
                created_at: entry.created_at,
                last_accessed: entry.last_accessed,
            },
        })
    }

    /// Serve from cache or run `compute` exactly once per key, even
    /// under concurrent misses. `bypass` skips the lookup but still
    /// stores the fresh result.
    pub fn get_or_compute<F>(
        &self,
        hash: &str,
        profile_id: &str,
        bypass: bool,
        compute: F,
    ) -> JyotishResult<CachedResult>
    where
        F: FnOnce() -> JyotishResult<PipelineResult>,
    {
        if !bypass {
            if let Some(hit) = self.get(hash) {
                debug!(hash, "cache hit");
                return Ok(hit);
            }
        }

        let flight: Arc<Mutex<()>> = self
            .in_flight
            .entry(hash.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = flight.lock().expect("flight lock poisoned");

        // A concurrent caller may have stored the entry while this one
        // waited on the lock.
        if !bypass {
            if let Some(hit) = self.get(hash) {
                return Ok(hit);
            }
        }

        let outcome = compute();
        self.in_flight.remove(hash);
        let result = Arc::new(outcome?);
        let now = Utc::now();
        self.entries.insert(
            hash.to_string(),
            Entry {
                result: Arc::clone(&result),
                created_at: now,
                last_accessed: now,
                access_count: 1,
                profile_id: profile_id.to_string(),
            },
        );
        debug!(hash, "cache store");

        Ok(CachedResult {
            result,
            meta: CacheMeta {
                cache_hit: false,
                access_count: 1,
                created_at: now,
                last_accessed: now,
            },
        })
    }

    /// Drop a single entry by its canonical hash.
    pub fn invalidate(&self, hash: &str) -> bool {
        self.entries.remove(hash).is_some()
    }

    /// Drop every entry for one profile. Called when its chart changes.
    pub fn invalidate_profile(&self, profile_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.profile_id != profile_id);
        let removed = before - self.entries.len();
        if removed > 0 {
            info!(profile_id, removed, "invalidated cached results");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        match (now - entry.created_at).to_std() {
            Ok(age) => age >= self.ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use jyotish_core::models::{InterpretRequest, UsageReport};

    fn result(profile: &str) -> PipelineResult {
        let request = InterpretRequest {
            profile_id: profile.to_string(),
            chart_version: 1,
            query_text: None,
            domains: None,
            include_predictions: false,
            include_transits: false,
            window_months: 12,
            force_regenerate: false,
        };
        PipelineResult {
            canonical_hash: crate::canonical_hash(&request),
            request,
            interpretation: "a calm reading".to_string(),
            domain_analyses: Vec::new(),
            predictions: Vec::new(),
            rules_used: Vec::new(),
            verification: None,
            usage: UsageReport {
                per_stage: BTreeMap::new(),
                total: 0,
                ceiling: 8000,
            },
            cache: CacheMeta {
                cache_hit: false,
                access_count: 0,
                created_at: Utc::now(),
                last_accessed: Utc::now(),
            },
            degraded: false,
            issues: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    fn cache_with_ttl(ttl_secs: u64) -> SessionCache {
        SessionCache::new(&CacheConfig { ttl_secs })
    }

    #[test]
    fn miss_then_hit_with_access_count() {
        let cache = cache_with_ttl(3600);
        let first = cache
            .get_or_compute("h1", "profile-a", false, || Ok(result("profile-a")))
            .unwrap();
        assert!(!first.meta.cache_hit);
        assert_eq!(first.meta.access_count, 1);

        let second = cache
            .get_or_compute("h1", "profile-a", false, || {
                panic!("must not recompute on a hit")
            })
            .unwrap();
        assert!(second.meta.cache_hit);
        assert_eq!(second.meta.access_count, 2);
    }

    #[test]
    fn bypass_recomputes_and_replaces() {
        let cache = cache_with_ttl(3600);
        cache
            .get_or_compute("h1", "profile-a", false, || Ok(result("profile-a")))
            .unwrap();

        let mut fresh = result("profile-a");
        fresh.interpretation = "a fresh reading".to_string();
        let replaced = cache
            .get_or_compute("h1", "profile-a", true, || Ok(fresh))
            .unwrap();
        assert!(!replaced.meta.cache_hit);
        assert_eq!(replaced.result.interpretation, "a fresh reading");

        let hit = cache.get("h1").unwrap();
        assert_eq!(hit.result.interpretation, "a fresh reading");
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = cache_with_ttl(0);
        cache
            .get_or_compute("h1", "profile-a", false, || Ok(result("profile-a")))
            .unwrap();
        assert!(cache.get("h1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_computation_stores_nothing() {
        let cache = cache_with_ttl(3600);
        let err = cache.get_or_compute("h1", "profile-a", false, || {
            Err(jyotish_core::errors::JyotishError::Validation {
                reason: "boom".to_string(),
            })
        });
        assert!(err.is_err());
        assert!(cache.get("h1").is_none());
    }

    #[test]
    fn invalidate_removes_a_single_entry() {
        let cache = cache_with_ttl(3600);
        cache
            .get_or_compute("h1", "profile-a", false, || Ok(result("profile-a")))
            .unwrap();
        assert!(cache.invalidate("h1"));
        assert!(!cache.invalidate("h1"));
        assert!(cache.get("h1").is_none());
    }

    #[test]
    fn invalidate_profile_only_touches_that_profile() {
        let cache = cache_with_ttl(3600);
        cache
            .get_or_compute("h1", "profile-a", false, || Ok(result("profile-a")))
            .unwrap();
        cache
            .get_or_compute("h2", "profile-b", false, || Ok(result("profile-b")))
            .unwrap();

        assert_eq!(cache.invalidate_profile("profile-a"), 1);
        assert!(cache.get("h1").is_none());
        assert!(cache.get("h2").is_some());
    }
}
