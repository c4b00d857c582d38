// AWS EC2 on-demand pricing via the public offers index.
// Two-step fetch: region index -> region offer file, then a join of
// products against their OnDemand price dimensions.

use serde_json::Value;
use tracing::{info, warn};

use super::{PriceSource, SchemaError};
use crate::models::{Generation, InstanceCategory, PriceRecord, Provider};

const REGION_INDEX_URL: &str =
    "https://pricing.us-east-1.amazonaws.com/offers/v1.0/aws/AmazonEC2/current/region_index.json";
const OFFERS_BASE_URL: &str = "https://pricing.us-east-1.amazonaws.com";

pub struct AwsSource {
    client: reqwest::Client,
    region: String,
}

impl AwsSource {
    pub fn new(client: reqwest::Client, region: String) -> Self {
        Self { client, region }
    }

    async fn fetch_live(&self) -> anyhow::Result<Vec<PriceRecord>> {
        let index: Value = self
            .client
            .get(REGION_INDEX_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let version_url = index
            .pointer(&format!("/regions/{}/currentVersionUrl", self.region))
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::new(Provider::Aws, "regions.<region>.currentVersionUrl"))?;

        let offer: Value = self
            .client
            .get(format!("{OFFERS_BASE_URL}{version_url}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_offer(&offer, region_display_name(&self.region))
    }
}

#[async_trait::async_trait]
impl PriceSource for AwsSource {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    async fn fetch(&self) -> anyhow::Result<Vec<PriceRecord>> {
        match self.fetch_live().await {
            Ok(records) => {
                info!(record_count = records.len(), "AWS price fetch complete");
                Ok(records)
            }
            Err(e) => {
                warn!(error = %e, "AWS price fetch failed; using static fallback prices");
                Ok(fallback_records())
            }
        }
    }
}

/// Extracts on-demand Linux shared-tenancy instances from an EC2 offer file.
fn parse_offer(offer: &Value, region_display: &str) -> anyhow::Result<Vec<PriceRecord>> {
    let products = offer
        .get("products")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::new(Provider::Aws, "products"))?;
    let terms = offer
        .pointer("/terms/OnDemand")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::new(Provider::Aws, "terms.OnDemand"))?;

    let mut records = Vec::new();
    for (product_id, product) in products {
        if product.get("productFamily").and_then(Value::as_str) != Some("Compute Instance") {
            continue;
        }
        let Some(attrs) = product.get("attributes").and_then(Value::as_object) else {
            continue;
        };
        if attrs.get("operatingSystem").and_then(Value::as_str) != Some("Linux")
            || attrs.get("tenancy").and_then(Value::as_str) != Some("Shared")
        {
            continue;
        }
        let Some(instance_type) = attrs.get("instanceType").and_then(Value::as_str) else {
            continue;
        };

        // First OnDemand term, first price dimension; skip products with no pricing.
        let Some(hourly) = terms
            .get(product_id)
            .and_then(Value::as_object)
            .and_then(|t| t.values().next())
            .and_then(|term| term.get("priceDimensions"))
            .and_then(Value::as_object)
            .and_then(|d| d.values().next())
            .and_then(|dim| dim.pointer("/pricePerUnit/USD"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
        else {
            continue;
        };

        let attr_string = |key: &str| {
            attrs
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string()
        };
        let generation = if attrs
            .get("instanceFamily")
            .and_then(Value::as_str)
            .is_some_and(|f| f.contains("Previous"))
        {
            Generation::Previous
        } else {
            Generation::Current
        };

        records.push(PriceRecord {
            provider: Provider::Aws,
            description: instance_type.to_string(),
            category: categorize(instance_type),
            vcpu: attr_string("vcpu"),
            memory: attr_string("memory"),
            region: region_display.to_string(),
            hourly_price_usd: hourly,
            generation,
        });
    }
    Ok(records)
}

fn categorize(instance_type: &str) -> InstanceCategory {
    match instance_type.chars().next() {
        Some('t') => InstanceCategory::GeneralPurpose,
        Some('c') => InstanceCategory::ComputeOptimized,
        Some('r') => InstanceCategory::MemoryOptimized,
        Some('i') => InstanceCategory::StorageOptimized,
        Some('g') | Some('p') => InstanceCategory::GpuOptimized,
        _ => InstanceCategory::GeneralPurpose,
    }
}

fn region_display_name(region: &str) -> &str {
    match region {
        "us-east-1" => "US East (N. Virginia)",
        "us-west-2" => "US West (Oregon)",
        "eu-west-1" => "EU (Ireland)",
        "ap-southeast-1" => "Asia Pacific (Singapore)",
        other => other,
    }
}

/// Static price list used when the live fetch fails.
fn fallback_records() -> Vec<PriceRecord> {
    const FALLBACK: [(&str, InstanceCategory, &str, &str, f64); 14] = [
        ("t3.micro", InstanceCategory::GeneralPurpose, "2", "1 GB", 0.0104),
        ("t3.small", InstanceCategory::GeneralPurpose, "2", "2 GB", 0.0208),
        ("t3.medium", InstanceCategory::GeneralPurpose, "2", "4 GB", 0.0416),
        ("t3.large", InstanceCategory::GeneralPurpose, "2", "8 GB", 0.0832),
        ("t3.xlarge", InstanceCategory::GeneralPurpose, "4", "16 GB", 0.1664),
        ("c5.large", InstanceCategory::ComputeOptimized, "2", "4 GB", 0.085),
        ("c5.xlarge", InstanceCategory::ComputeOptimized, "4", "8 GB", 0.17),
        ("c5.2xlarge", InstanceCategory::ComputeOptimized, "8", "16 GB", 0.34),
        ("r5.large", InstanceCategory::MemoryOptimized, "2", "16 GB", 0.126),
        ("r5.xlarge", InstanceCategory::MemoryOptimized, "4", "32 GB", 0.252),
        ("r5.2xlarge", InstanceCategory::MemoryOptimized, "8", "64 GB", 0.504),
        ("m5.large", InstanceCategory::GeneralPurpose, "2", "8 GB", 0.096),
        ("m5.xlarge", InstanceCategory::GeneralPurpose, "4", "16 GB", 0.192),
        ("m5.2xlarge", InstanceCategory::GeneralPurpose, "8", "32 GB", 0.384),
    ];

    FALLBACK
        .iter()
        .map(|(name, category, vcpu, memory, hourly)| PriceRecord {
            provider: Provider::Aws,
            description: (*name).to_string(),
            category: *category,
            vcpu: (*vcpu).to_string(),
            memory: (*memory).to_string(),
            region: "us-east-1".to_string(),
            hourly_price_usd: *hourly,
            generation: Generation::Current,
        })
        .collect()
}
