//! Postal-code resolution with an explicit, injectable memo cache.
//!
//! The cache is process-lifetime, bounded, and owned by the resolver
//! instance rather than module-level state, so tests can pre-seed or
//! isolate it. It is a latency optimization only and carries no
//! cross-instance consistency guarantee.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::officials::OfficialSnapshot;
use crate::domain::ports::{CivicLookup, CivicLookupError};

/// City/state/region triple resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub postal_code: String,
    pub city: String,
    pub state: String,
    /// Congressional district or equivalent region label.
    pub region: String,
}

impl Location {
    /// Safe default substituted when geocoding fails.
    pub fn unknown(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
            city: "your community".to_owned(),
            state: String::new(),
            region: String::new(),
        }
    }

    /// Whether this location came from the safe default, not a lookup.
    pub fn is_unknown(&self) -> bool {
        self.state.is_empty()
    }
}

/// Location plus the elected officials serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    pub location: Location,
    pub officials: Vec<OfficialSnapshot>,
}

impl Jurisdiction {
    /// Jurisdiction for an unresolvable postal code: unknown location and
    /// no officials.
    pub fn unknown(postal_code: impl Into<String>) -> Self {
        Self {
            location: Location::unknown(postal_code),
            officials: Vec::new(),
        }
    }
}

/// Insertion-order bounded map; the oldest entry is evicted at capacity.
#[derive(Debug)]
struct MemoCache {
    capacity: usize,
    entries: HashMap<String, Jurisdiction>,
    order: VecDeque<String>,
}

impl MemoCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, postal_code: &str) -> Option<Jurisdiction> {
        self.entries.get(postal_code).cloned()
    }

    fn insert(&mut self, postal_code: String, jurisdiction: Jurisdiction) {
        if self.entries.contains_key(&postal_code) {
            self.entries.insert(postal_code, jurisdiction);
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(postal_code.clone());
        self.entries.insert(postal_code, jurisdiction);
    }
}

/// Resolves postal codes through the civic lookup port, memoizing results.
#[derive(Clone)]
pub struct LocationResolver {
    lookup: Arc<dyn CivicLookup>,
    cache: Arc<Mutex<MemoCache>>,
}

impl LocationResolver {
    const DEFAULT_CACHE_CAPACITY: usize = 1024;

    /// Build a resolver with the default cache capacity.
    pub fn new(lookup: Arc<dyn CivicLookup>) -> Self {
        Self::with_capacity(lookup, Self::DEFAULT_CACHE_CAPACITY)
    }

    /// Build a resolver with an explicit cache capacity.
    pub fn with_capacity(lookup: Arc<dyn CivicLookup>, capacity: usize) -> Self {
        Self {
            lookup,
            cache: Arc::new(Mutex::new(MemoCache::new(capacity))),
        }
    }

    /// Resolve a postal code to its jurisdiction.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures; callers that can degrade should use
    /// [`LocationResolver::resolve_or_unknown`].
    pub async fn resolve(&self, postal_code: &str) -> Result<Jurisdiction, CivicLookupError> {
        let key = postal_code.trim().to_owned();
        if let Some(hit) = self.cache.lock().await.get(&key) {
            return Ok(hit);
        }

        let jurisdiction = self.lookup.lookup_postal_code(&key).await?;
        self.cache
            .lock()
            .await
            .insert(key, jurisdiction.clone());
        Ok(jurisdiction)
    }

    /// Resolve a postal code, degrading to the unknown jurisdiction when the
    /// lookup fails. Failures are logged, never cached.
    pub async fn resolve_or_unknown(&self, postal_code: &str) -> Jurisdiction {
        match self.resolve(postal_code).await {
            Ok(jurisdiction) => jurisdiction,
            Err(error) => {
                warn!(%postal_code, %error, "civic lookup failed; using unknown location");
                Jurisdiction::unknown(postal_code)
            }
        }
    }

    /// Pre-seed the cache, bypassing the lookup port. Test support.
    pub async fn seed(&self, postal_code: impl Into<String>, jurisdiction: Jurisdiction) {
        self.cache
            .lock()
            .await
            .insert(postal_code.into(), jurisdiction);
    }
}
