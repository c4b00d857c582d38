// Per-provider and aggregate snapshots; immutable once constructed

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{PriceRecord, PriceRecordDisplay, Provider};

/// Point-in-time price list for one provider, sorted ascending by hourly rate.
#[derive(Debug, Clone)]
pub struct ProviderSnapshot {
    pub records: Vec<PriceRecord>,
    pub captured_at: DateTime<Utc>,
}

impl ProviderSnapshot {
    /// Stable sort: records with equal hourly rates keep the adapter's ordering.
    pub fn new(mut records: Vec<PriceRecord>, captured_at: DateTime<Utc>) -> Self {
        records.sort_by(|a, b| {
            a.hourly_price_usd
                .partial_cmp(&b.hourly_price_usd)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            records,
            captured_at,
        }
    }

    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            records: Vec::new(),
            captured_at,
        }
    }
}

/// The three provider snapshots under one `last_updated` stamp.
/// `last_updated` is set once, when the aggregation cycle completes.
#[derive(Debug, Clone)]
pub struct AggregateSnapshot {
    pub aws: Arc<ProviderSnapshot>,
    pub azure: Arc<ProviderSnapshot>,
    pub gcp: Arc<ProviderSnapshot>,
    pub last_updated: DateTime<Utc>,
}

impl AggregateSnapshot {
    pub fn provider(&self, provider: Provider) -> &ProviderSnapshot {
        self.provider_arc(provider)
    }

    pub(crate) fn provider_arc(&self, provider: Provider) -> &Arc<ProviderSnapshot> {
        match provider {
            Provider::Aws => &self.aws,
            Provider::Azure => &self.azure,
            Provider::Gcp => &self.gcp,
        }
    }

    pub fn total_records(&self) -> usize {
        self.aws.records.len() + self.azure.records.len() + self.gcp.records.len()
    }
}

/// Wire form of GET /prices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshotDisplay {
    pub aws: Vec<PriceRecordDisplay>,
    pub azure: Vec<PriceRecordDisplay>,
    pub gcp: Vec<PriceRecordDisplay>,
    /// ISO-8601 UTC, e.g. "2026-08-07T12:00:00.000Z".
    pub last_updated: String,
}

impl From<&AggregateSnapshot> for AggregateSnapshotDisplay {
    fn from(snapshot: &AggregateSnapshot) -> Self {
        Self {
            aws: snapshot.aws.records.iter().map(Into::into).collect(),
            azure: snapshot.azure.records.iter().map(Into::into).collect(),
            gcp: snapshot.gcp.records.iter().map(Into::into).collect(),
            last_updated: snapshot
                .last_updated
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
