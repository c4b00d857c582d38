// Shared test helpers
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pricefeed::aggregator::Aggregator;
use pricefeed::cache_store::CacheStore;
use pricefeed::models::*;
use pricefeed::providers::PriceSource;
use pricefeed::query::QueryService;

pub fn record(provider: Provider, description: &str, hourly: f64) -> PriceRecord {
    PriceRecord {
        provider,
        description: description.to_string(),
        category: InstanceCategory::GeneralPurpose,
        vcpu: "2".to_string(),
        memory: "8 GB".to_string(),
        region: "test-region".to_string(),
        hourly_price_usd: hourly,
        generation: Generation::Current,
    }
}

/// Price source returning fixed records, with a call counter and optional
/// failure windows (fail the first N calls, or every call from call N on).
pub struct StubSource {
    provider: Provider,
    records: Vec<PriceRecord>,
    pub calls: Arc<AtomicUsize>,
    fail_first: usize,
    fail_from: usize,
    delay: Duration,
}

impl StubSource {
    pub fn new(provider: Provider, records: Vec<PriceRecord>) -> Self {
        Self {
            provider,
            records,
            calls: Arc::new(AtomicUsize::new(0)),
            fail_first: 0,
            fail_from: usize::MAX,
            delay: Duration::ZERO,
        }
    }

    /// Fails every call.
    pub fn failing(provider: Provider) -> Self {
        let mut stub = Self::new(provider, Vec::new());
        stub.fail_first = usize::MAX;
        stub
    }

    /// Succeeds for the first `n` calls, fails afterwards.
    pub fn failing_from(provider: Provider, records: Vec<PriceRecord>, n: usize) -> Self {
        let mut stub = Self::new(provider, records);
        stub.fail_from = n;
        stub
    }

    /// Adds latency to each fetch so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PriceSource for StubSource {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn fetch(&self) -> anyhow::Result<Vec<PriceRecord>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if call < self.fail_first || call >= self.fail_from {
            anyhow::bail!("{} fetch refused (stub)", self.provider.as_str());
        }
        Ok(self.records.clone())
    }
}

/// Wires stub sources into a cache + aggregator + query service.
pub fn stub_stack(
    aws: StubSource,
    azure: StubSource,
    gcp: StubSource,
    ttl: Duration,
) -> (Arc<CacheStore>, Arc<Aggregator>, Arc<QueryService>) {
    let cache = Arc::new(CacheStore::new(ttl));
    let aggregator = Arc::new(Aggregator::new(
        Arc::new(aws),
        Arc::new(azure),
        Arc::new(gcp),
        cache.clone(),
    ));
    let query = Arc::new(QueryService::new(cache.clone(), aggregator.clone()));
    (cache, aggregator, query)
}
