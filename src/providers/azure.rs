// Azure VM on-demand pricing via the retail prices API.
// One filtered query per fetch; SKUs are deduplicated on armSkuName
// (the API returns one row per meter).

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, warn};

use super::PriceSource;
use crate::models::{Generation, InstanceCategory, PriceRecord, Provider};

const RETAIL_PRICES_URL: &str = "https://prices.azure.com/api/retail/prices";

pub struct AzureSource {
    client: reqwest::Client,
    region: String,
}

#[derive(Debug, Deserialize)]
struct RetailResponse {
    #[serde(rename = "Items", default)]
    items: Vec<RetailItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetailItem {
    #[serde(rename = "type", default)]
    price_type: String,
    #[serde(default)]
    sku_name: String,
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    arm_sku_name: String,
    #[serde(default)]
    retail_price: f64,
}

impl AzureSource {
    pub fn new(client: reqwest::Client, region: String) -> Self {
        Self { client, region }
    }

    async fn fetch_live(&self) -> anyhow::Result<Vec<PriceRecord>> {
        let filter = format!(
            "serviceName eq 'Virtual Machines' and priceType eq 'Consumption' and armRegionName eq '{}'",
            self.region
        );
        let response: RetailResponse = self
            .client
            .get(RETAIL_PRICES_URL)
            .query(&[("$filter", filter.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_items(
            response.items,
            region_display_name(&self.region),
        ))
    }
}

#[async_trait::async_trait]
impl PriceSource for AzureSource {
    fn provider(&self) -> Provider {
        Provider::Azure
    }

    async fn fetch(&self) -> anyhow::Result<Vec<PriceRecord>> {
        match self.fetch_live().await {
            Ok(records) => {
                info!(record_count = records.len(), "Azure price fetch complete");
                Ok(records)
            }
            Err(e) => {
                warn!(error = %e, "Azure price fetch failed; using static fallback prices");
                Ok(fallback_records())
            }
        }
    }
}

/// Keeps Linux consumption meters only; the first meter per SKU wins.
fn parse_items(items: Vec<RetailItem>, region_display: &str) -> Vec<PriceRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for item in items {
        if item.price_type != "Consumption"
            || item.sku_name.is_empty()
            || item.sku_name.contains("Low Priority")
            || item.sku_name.contains("Spot")
            || item.product_name.contains("Windows")
        {
            continue;
        }
        if item.arm_sku_name.is_empty() || !seen.insert(item.arm_sku_name.clone()) {
            continue;
        }

        let size_name = item
            .arm_sku_name
            .strip_prefix("Standard_")
            .unwrap_or(&item.arm_sku_name);
        let (vcpu, memory) = instance_specs(size_name);
        let generation = if item.sku_name.contains("v2") {
            Generation::Previous
        } else {
            Generation::Current
        };

        records.push(PriceRecord {
            provider: Provider::Azure,
            description: size_name.replace('_', " "),
            category: categorize(size_name),
            vcpu,
            memory,
            region: region_display.to_string(),
            hourly_price_usd: item.retail_price,
            generation,
        });
    }
    records
}

/// vCPU and memory for the VM sizes the service knows about; "N/A" otherwise
/// (the retail API does not carry hardware specs).
fn instance_specs(size_name: &str) -> (String, String) {
    const SPECS: [(&str, &str, &str); 12] = [
        ("B1s", "1", "1 GB"),
        ("B2s", "2", "4 GB"),
        ("B4ms", "4", "16 GB"),
        ("D2s_v3", "2", "8 GB"),
        ("D4s_v3", "4", "16 GB"),
        ("D8s_v3", "8", "32 GB"),
        ("E2s_v3", "2", "16 GB"),
        ("E4s_v3", "4", "32 GB"),
        ("E8s_v3", "8", "64 GB"),
        ("F2s_v2", "2", "4 GB"),
        ("F4s_v2", "4", "8 GB"),
        ("F8s_v2", "8", "16 GB"),
    ];

    let normalized = size_name.replace('_', "").to_lowercase();
    for (size, vcpu, memory) in SPECS {
        if normalized.contains(&size.replace('_', "").to_lowercase()) {
            return (vcpu.to_string(), memory.to_string());
        }
    }
    ("N/A".to_string(), "N/A".to_string())
}

fn categorize(size_name: &str) -> InstanceCategory {
    match size_name.to_lowercase().chars().next() {
        Some('b') | Some('d') => InstanceCategory::GeneralPurpose,
        Some('e') | Some('m') => InstanceCategory::MemoryOptimized,
        Some('f') => InstanceCategory::ComputeOptimized,
        Some('g') => InstanceCategory::GpuOptimized,
        Some('h') => InstanceCategory::HighPerformance,
        Some('l') => InstanceCategory::StorageOptimized,
        _ => InstanceCategory::GeneralPurpose,
    }
}

fn region_display_name(region: &str) -> &str {
    match region {
        "eastus" => "East US",
        "westus2" => "West US 2",
        "westeurope" => "West Europe",
        "southeastasia" => "Southeast Asia",
        other => other,
    }
}

/// Static price list used when the live fetch fails.
fn fallback_records() -> Vec<PriceRecord> {
    const FALLBACK: [(&str, InstanceCategory, &str, &str, f64); 3] = [
        ("B2s", InstanceCategory::GeneralPurpose, "2", "4 GB", 0.0416),
        ("D2s v3", InstanceCategory::GeneralPurpose, "2", "8 GB", 0.096),
        ("F4s v2", InstanceCategory::ComputeOptimized, "4", "8 GB", 0.169),
    ];

    FALLBACK
        .iter()
        .map(|(name, category, vcpu, memory, hourly)| PriceRecord {
            provider: Provider::Azure,
            description: (*name).to_string(),
            category: *category,
            vcpu: (*vcpu).to_string(),
            memory: (*memory).to_string(),
            region: "East US".to_string(),
            hourly_price_usd: *hourly,
            generation: Generation::Current,
        })
        .collect()
}
