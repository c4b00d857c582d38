// Provider pricing sources.
//
// Each source owns its network call, schema translation and a built-in static
// price list it falls back to when its own fetch or parse fails. A source that
// returns Err instead is handled upstream by the aggregator (stale cache or
// empty snapshot).

mod aws;
mod azure;
mod gcp;

pub use aws::AwsSource;
pub use azure::AzureSource;
pub use gcp::GcpSource;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PriceRecord, Provider};

/// Coarse per-request timeout; provider pricing endpoints can be slow.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream payload did not have the expected shape.
#[derive(Debug, Error)]
#[error("unexpected {provider} payload: missing {field}")]
pub struct SchemaError {
    pub provider: Provider,
    pub field: &'static str,
}

impl SchemaError {
    fn new(provider: Provider, field: &'static str) -> Self {
        Self { provider, field }
    }
}

/// A source of normalized price records for one provider.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn provider(&self) -> Provider;

    async fn fetch(&self) -> anyhow::Result<Vec<PriceRecord>>;
}

pub fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}
