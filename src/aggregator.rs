// Multi-source price aggregation with per-source isolation.
//
// A cycle fetches all three providers concurrently and always produces a
// snapshot: a failed source keeps its cached snapshot (stale) or degrades to
// an empty one. Cycles are serialized on an internal lock, so a refresh tick
// landing mid-cycle queues behind it and two cycles never race their cache
// writes.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache_store::CacheStore;
use crate::models::{AggregateSnapshot, PriceRecord, Provider, ProviderSnapshot};
use crate::providers::PriceSource;

/// Which branch produced a provider's part of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The source returned records this cycle.
    Fresh,
    /// The source failed; the previous cached snapshot was kept.
    Stale,
    /// The source failed and nothing was cached.
    Empty,
}

impl SourceOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOutcome::Fresh => "fresh",
            SourceOutcome::Stale => "stale",
            SourceOutcome::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProviderOutcome {
    pub provider: Provider,
    pub outcome: SourceOutcome,
    pub record_count: usize,
}

pub struct Aggregator {
    aws: Arc<dyn PriceSource>,
    azure: Arc<dyn PriceSource>,
    gcp: Arc<dyn PriceSource>,
    cache: Arc<CacheStore>,
    flight: Mutex<()>,
}

impl Aggregator {
    pub fn new(
        aws: Arc<dyn PriceSource>,
        azure: Arc<dyn PriceSource>,
        gcp: Arc<dyn PriceSource>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            aws,
            azure,
            gcp,
            cache,
            flight: Mutex::new(()),
        }
    }

    /// Runs one aggregation cycle. Never fails; a second caller queues behind
    /// the in-flight cycle and runs after it.
    pub async fn run(&self) -> Arc<AggregateSnapshot> {
        self.run_with_outcomes().await.0
    }

    /// `run` plus the per-provider branch tags for the cycle.
    pub async fn run_with_outcomes(&self) -> (Arc<AggregateSnapshot>, [ProviderOutcome; 3]) {
        let _flight = self.flight.lock().await;
        self.cycle().await
    }

    /// Cold-read entry: if another cycle filled the cache while this caller
    /// waited on the in-flight lock, return that snapshot instead of fetching
    /// again. N concurrent cold readers collapse into one cycle.
    pub async fn run_coalesced(&self) -> Arc<AggregateSnapshot> {
        let _flight = self.flight.lock().await;
        if let Some(snapshot) = self.cache.aggregate_snapshot().await {
            return snapshot;
        }
        self.cycle().await.0
    }

    async fn cycle(&self) -> (Arc<AggregateSnapshot>, [ProviderOutcome; 3]) {
        let (aws, azure, gcp) =
            tokio::join!(self.aws.fetch(), self.azure.fetch(), self.gcp.fetch());

        let now = Utc::now();
        let (aws, aws_outcome) = self.resolve(Provider::Aws, aws, now).await;
        let (azure, azure_outcome) = self.resolve(Provider::Azure, azure, now).await;
        let (gcp, gcp_outcome) = self.resolve(Provider::Gcp, gcp, now).await;

        let snapshot = Arc::new(AggregateSnapshot {
            aws,
            azure,
            gcp,
            last_updated: now,
        });

        // One logical update: fresh provider snapshots first, then the aggregate.
        // Stale snapshots stay as written by the cycle that fetched them (their
        // TTL is not extended); empty ones are never written.
        for outcome in [aws_outcome, azure_outcome, gcp_outcome] {
            if outcome.outcome == SourceOutcome::Fresh {
                self.cache
                    .set_provider_snapshot(
                        outcome.provider,
                        Arc::clone(snapshot.provider_arc(outcome.provider)),
                    )
                    .await;
            }
        }
        self.cache
            .set_aggregate_snapshot(Arc::clone(&snapshot))
            .await;

        info!(
            aws_records = aws_outcome.record_count,
            aws_outcome = aws_outcome.outcome.as_str(),
            azure_records = azure_outcome.record_count,
            azure_outcome = azure_outcome.outcome.as_str(),
            gcp_records = gcp_outcome.record_count,
            gcp_outcome = gcp_outcome.outcome.as_str(),
            "price aggregation cycle complete"
        );

        (snapshot, [aws_outcome, azure_outcome, gcp_outcome])
    }

    async fn resolve(
        &self,
        provider: Provider,
        result: anyhow::Result<Vec<PriceRecord>>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> (Arc<ProviderSnapshot>, ProviderOutcome) {
        let (snapshot, outcome) = match result {
            Ok(records) => (
                Arc::new(ProviderSnapshot::new(records, now)),
                SourceOutcome::Fresh,
            ),
            Err(e) => {
                warn!(
                    provider = provider.as_str(),
                    error = %e,
                    "price fetch failed; falling back to cached snapshot"
                );
                match self.cache.provider_snapshot(provider).await {
                    Some(previous) => (previous, SourceOutcome::Stale),
                    None => (Arc::new(ProviderSnapshot::empty(now)), SourceOutcome::Empty),
                }
            }
        };
        let record_count = snapshot.records.len();
        (
            snapshot,
            ProviderOutcome {
                provider,
                outcome,
                record_count,
            },
        )
    }
}
