// Read path for price queries.
//
// A cached aggregate is served as-is, however old; the refresh worker is the
// sole freshness mechanism, so a warm read never touches the network. Only an
// empty cache (first request before the startup cycle lands, or after
// eviction) aggregates on demand, coalesced with any concurrent cold readers.

use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::cache_store::CacheStore;
use crate::models::AggregateSnapshot;

pub struct QueryService {
    cache: Arc<CacheStore>,
    aggregator: Arc<Aggregator>,
}

impl QueryService {
    pub fn new(cache: Arc<CacheStore>, aggregator: Arc<Aggregator>) -> Self {
        Self { cache, aggregator }
    }

    pub async fn get_prices(&self) -> Arc<AggregateSnapshot> {
        if let Some(snapshot) = self.cache.aggregate_snapshot().await {
            return snapshot;
        }
        self.aggregator.run_coalesced().await
    }
}
