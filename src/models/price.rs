// Normalized price records and derived display prices

use serde::{Deserialize, Serialize};

/// Hours billed per month; monthly and yearly prices derive from the hourly rate.
pub const HOURS_PER_MONTH: f64 = 730.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "Azure")]
    Azure,
    #[serde(rename = "GCP")]
    Gcp,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "AWS",
            Provider::Azure => "Azure",
            Provider::Gcp => "GCP",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workload category of an instance SKU; serializes to the display string (e.g. "General Purpose").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceCategory {
    #[serde(rename = "General Purpose")]
    GeneralPurpose,
    #[serde(rename = "Compute Optimized")]
    ComputeOptimized,
    #[serde(rename = "Memory Optimized")]
    MemoryOptimized,
    #[serde(rename = "Storage Optimized")]
    StorageOptimized,
    #[serde(rename = "GPU Optimized")]
    GpuOptimized,
    #[serde(rename = "High Performance")]
    HighPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generation {
    Current,
    Previous,
}

/// One priceable SKU from one provider. Only the hourly rate is stored;
/// monthly/yearly are always recomputed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub provider: Provider,
    pub description: String,
    #[serde(rename = "type")]
    pub category: InstanceCategory,
    /// vCPU count as reported upstream; "N/A" when unknown.
    pub vcpu: String,
    /// Human-readable memory size; "N/A" when unknown.
    pub memory: String,
    pub region: String,
    pub hourly_price_usd: f64,
    pub generation: Generation,
}

/// Formatted currency strings for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDisplay {
    pub hourly: String,
    pub monthly: String,
    pub yearly: String,
}

impl PriceDisplay {
    pub fn from_hourly(hourly_usd: f64) -> Self {
        Self {
            hourly: format!("${hourly_usd:.4}"),
            monthly: format!("${:.2}", hourly_usd * HOURS_PER_MONTH),
            yearly: format!("${:.2}", hourly_usd * HOURS_PER_MONTH * 12.0),
        }
    }
}

/// Wire form of a record: identity fields plus the derived price strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecordDisplay {
    pub provider: Provider,
    pub description: String,
    #[serde(rename = "type")]
    pub category: InstanceCategory,
    pub vcpu: String,
    pub memory: String,
    pub region: String,
    pub price: PriceDisplay,
    pub generation: Generation,
}

impl From<&PriceRecord> for PriceRecordDisplay {
    fn from(record: &PriceRecord) -> Self {
        Self {
            provider: record.provider,
            description: record.description.clone(),
            category: record.category,
            vcpu: record.vcpu.clone(),
            memory: record.memory.clone(),
            region: record.region.clone(),
            price: PriceDisplay::from_hourly(record.hourly_price_usd),
            generation: record.generation,
        }
    }
}
