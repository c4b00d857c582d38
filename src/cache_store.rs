// Last-known-good snapshot cache.
//
// One slot per provider plus one for the aggregate, each behind its own lock,
// so operations on different keys never block each other. TTL governs eviction
// by the periodic sweep only: `get` returns whatever the slot holds, however
// old. An entry the sweep evicts before the next successful refresh is gone
// for fallback purposes too; that provider then degrades from stale data to
// empty data until a fetch succeeds again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::{AggregateSnapshot, Provider, ProviderSnapshot};

struct Entry<T> {
    value: Arc<T>,
    expires_at: Instant,
}

struct Slot<T>(RwLock<Option<Entry<T>>>);

impl<T> Slot<T> {
    fn new() -> Self {
        Self(RwLock::new(None))
    }

    async fn get(&self) -> Option<Arc<T>> {
        self.0.read().await.as_ref().map(|e| e.value.clone())
    }

    async fn set(&self, value: Arc<T>, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        *self.0.write().await = Some(entry);
    }

    /// Returns true when an expired entry was evicted.
    async fn evict_expired(&self, now: Instant) -> bool {
        let mut guard = self.0.write().await;
        match guard.as_ref() {
            Some(entry) if now >= entry.expires_at => {
                *guard = None;
                true
            }
            _ => false,
        }
    }
}

pub struct CacheStore {
    ttl: Duration,
    aws: Slot<ProviderSnapshot>,
    azure: Slot<ProviderSnapshot>,
    gcp: Slot<ProviderSnapshot>,
    aggregate: Slot<AggregateSnapshot>,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            aws: Slot::new(),
            azure: Slot::new(),
            gcp: Slot::new(),
            aggregate: Slot::new(),
        }
    }

    fn provider_slot(&self, provider: Provider) -> &Slot<ProviderSnapshot> {
        match provider {
            Provider::Aws => &self.aws,
            Provider::Azure => &self.azure,
            Provider::Gcp => &self.gcp,
        }
    }

    pub async fn provider_snapshot(&self, provider: Provider) -> Option<Arc<ProviderSnapshot>> {
        self.provider_slot(provider).get().await
    }

    /// Unconditional overwrite, last writer wins.
    pub async fn set_provider_snapshot(&self, provider: Provider, snapshot: Arc<ProviderSnapshot>) {
        self.provider_slot(provider).set(snapshot, self.ttl).await;
    }

    pub async fn aggregate_snapshot(&self) -> Option<Arc<AggregateSnapshot>> {
        self.aggregate.get().await
    }

    pub async fn set_aggregate_snapshot(&self, snapshot: Arc<AggregateSnapshot>) {
        self.aggregate.set(snapshot, self.ttl).await;
    }

    /// Evicts entries whose TTL has elapsed; returns how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        for provider in Provider::ALL {
            if self.provider_slot(provider).evict_expired(now).await {
                evicted += 1;
            }
        }
        if self.aggregate.evict_expired(now).await {
            evicted += 1;
        }
        evicted
    }
}
