// GCP Compute Engine pricing via the static calculator pricelist.
// VM image entries carry one price per region; specs are inferred from
// the machine-type name.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::PriceSource;
use crate::models::{Generation, InstanceCategory, PriceRecord, Provider};

const PRICELIST_URL: &str =
    "https://cloudpricingcalculator.googleapis.com/static/data/pricelist.json";
const VM_IMAGE_PREFIX: &str = "CP-COMPUTEENGINE-VMIMAGE-";

pub struct GcpSource {
    client: reqwest::Client,
    region: String,
}

#[derive(Debug, Deserialize)]
struct PriceList {
    #[serde(rename = "gcp_price_list")]
    gcp_price_list: HashMap<String, Value>,
}

impl GcpSource {
    pub fn new(client: reqwest::Client, region: String) -> Self {
        Self { client, region }
    }

    async fn fetch_live(&self) -> anyhow::Result<Vec<PriceRecord>> {
        let pricelist: PriceList = self
            .client
            .get(PRICELIST_URL)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_pricelist(&pricelist.gcp_price_list, &self.region))
    }
}

#[async_trait::async_trait]
impl PriceSource for GcpSource {
    fn provider(&self) -> Provider {
        Provider::Gcp
    }

    async fn fetch(&self) -> anyhow::Result<Vec<PriceRecord>> {
        match self.fetch_live().await {
            Ok(records) if !records.is_empty() => {
                info!(record_count = records.len(), "GCP price fetch complete");
                Ok(records)
            }
            Ok(_) => {
                warn!("GCP pricelist had no VM image entries; using static fallback prices");
                Ok(fallback_records())
            }
            Err(e) => {
                warn!(error = %e, "GCP price fetch failed; using static fallback prices");
                Ok(fallback_records())
            }
        }
    }
}

fn parse_pricelist(price_list: &HashMap<String, Value>, region: &str) -> Vec<PriceRecord> {
    // Pricelist entries key regions with underscores ("us_central1").
    let region_key = region.replace('-', "_");
    let mut records = Vec::new();

    for (key, value) in price_list {
        let Some(suffix) = key.strip_prefix(VM_IMAGE_PREFIX) else {
            continue;
        };
        let Some(hourly) = value.get(&region_key).and_then(Value::as_f64) else {
            continue;
        };

        let name = suffix.to_lowercase();
        let category = categorize(&name);
        let (vcpu, memory) = instance_specs(&name, category);
        let generation = if name.starts_with("n2") || name.starts_with("c2") {
            Generation::Current
        } else {
            Generation::Previous
        };

        records.push(PriceRecord {
            provider: Provider::Gcp,
            description: name,
            category,
            vcpu,
            memory,
            region: region.to_string(),
            hourly_price_usd: hourly,
            generation,
        });
    }
    records
}

fn categorize(name: &str) -> InstanceCategory {
    if name.contains("highcpu") {
        InstanceCategory::ComputeOptimized
    } else if name.contains("highmem") {
        InstanceCategory::MemoryOptimized
    } else {
        InstanceCategory::GeneralPurpose
    }
}

/// vCPU from the trailing size number; memory estimated per category
/// (the pricelist does not carry hardware specs).
fn instance_specs(name: &str, category: InstanceCategory) -> (String, String) {
    let Some(size) = name
        .rsplit('-')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
    else {
        return ("N/A".to_string(), "N/A".to_string());
    };
    let gb_per_vcpu = match category {
        InstanceCategory::MemoryOptimized => 8,
        InstanceCategory::ComputeOptimized => 2,
        _ => 4,
    };
    (size.to_string(), format!("{} GB", size * gb_per_vcpu))
}

/// Static price list used when the live fetch fails or parses empty.
fn fallback_records() -> Vec<PriceRecord> {
    const FALLBACK: [(&str, InstanceCategory, &str, &str, f64); 6] = [
        ("e2-standard-2", InstanceCategory::GeneralPurpose, "2", "8 GB", 0.0671),
        ("e2-standard-4", InstanceCategory::GeneralPurpose, "4", "16 GB", 0.1342),
        ("c2-standard-4", InstanceCategory::ComputeOptimized, "4", "16 GB", 0.2088),
        ("c2-standard-8", InstanceCategory::ComputeOptimized, "8", "32 GB", 0.4176),
        ("n2-highmem-2", InstanceCategory::MemoryOptimized, "2", "16 GB", 0.1074),
        ("n2-highmem-4", InstanceCategory::MemoryOptimized, "4", "32 GB", 0.2148),
    ];

    FALLBACK
        .iter()
        .map(|(name, category, vcpu, memory, hourly)| PriceRecord {
            provider: Provider::Gcp,
            description: (*name).to_string(),
            category: *category,
            vcpu: (*vcpu).to_string(),
            memory: (*memory).to_string(),
            region: "us-central1".to_string(),
            hourly_price_usd: *hourly,
            generation: Generation::Current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pricelist(entries: &[(&str, Value)]) -> HashMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn parse_pricelist_extracts_vm_images_for_region() {
        let list = pricelist(&[
            (
                "CP-COMPUTEENGINE-VMIMAGE-N2-STANDARD-4",
                json!({"us_central1": 0.1942, "europe_west1": 0.2137}),
            ),
            ("CP-BIGQUERY-GENERAL", json!({"us": 5.0})),
        ]);
        let records = parse_pricelist(&list, "us-central1");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.description, "n2-standard-4");
        assert_eq!(r.category, InstanceCategory::GeneralPurpose);
        assert_eq!(r.vcpu, "4");
        assert_eq!(r.memory, "16 GB");
        assert_eq!(r.region, "us-central1");
        assert_eq!(r.hourly_price_usd, 0.1942);
        assert_eq!(r.generation, Generation::Current);
    }

    #[test]
    fn parse_pricelist_skips_entries_without_region_price() {
        let list = pricelist(&[(
            "CP-COMPUTEENGINE-VMIMAGE-N2-STANDARD-4",
            json!({"europe_west1": 0.2137}),
        )]);
        assert!(parse_pricelist(&list, "us-central1").is_empty());
    }

    #[test]
    fn category_and_memory_estimate_follow_machine_name() {
        let list = pricelist(&[
            (
                "CP-COMPUTEENGINE-VMIMAGE-N2-HIGHMEM-2",
                json!({"us_central1": 0.1074}),
            ),
            (
                "CP-COMPUTEENGINE-VMIMAGE-N1-HIGHCPU-4",
                json!({"us_central1": 0.1418}),
            ),
        ]);
        let mut records = parse_pricelist(&list, "us-central1");
        records.sort_by(|a, b| a.description.cmp(&b.description));

        let highcpu = &records[0];
        assert_eq!(highcpu.description, "n1-highcpu-4");
        assert_eq!(highcpu.category, InstanceCategory::ComputeOptimized);
        assert_eq!(highcpu.memory, "8 GB");
        assert_eq!(highcpu.generation, Generation::Previous);

        let highmem = &records[1];
        assert_eq!(highmem.category, InstanceCategory::MemoryOptimized);
        assert_eq!(highmem.memory, "16 GB");
        assert_eq!(highmem.generation, Generation::Current);
    }

    #[test]
    fn non_numeric_size_yields_na_specs() {
        let list = pricelist(&[(
            "CP-COMPUTEENGINE-VMIMAGE-F1-MICRO",
            json!({"us_central1": 0.0076}),
        )]);
        let records = parse_pricelist(&list, "us-central1");
        assert_eq!(records[0].vcpu, "N/A");
        assert_eq!(records[0].memory, "N/A");
    }

    #[test]
    fn fallback_is_gcp_only() {
        let records = fallback_records();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.provider == Provider::Gcp));
    }
}
