//! Data models for MES modules, sizing inputs and estimates

use serde::{Deserialize, Serialize};

/// A feature area of the MES with its resource-cost factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub core_factor: f64,
    pub ram_factor: f64,
    #[serde(default)]
    pub added_storage_per_asset: f64, // MB per asset per month
    #[serde(default)]
    pub mandatory: bool,
}

/// Default values for the historian storage form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageDefaults {
    pub assets: f64,
    pub tags_per_asset: f64,
    pub updates_per_min_per_tag: f64,
    pub retention_months: f64,
    pub row_size_bytes: f64,
    pub compression_ratio: f64,
    pub days_per_month: f64,
}

impl Default for StorageDefaults {
    fn default() -> Self {
        Self {
            assets: 4.0,
            tags_per_asset: 150.0,
            updates_per_min_per_tag: 60.0,
            retention_months: 12.0,
            row_size_bytes: 4.0,
            compression_ratio: 0.6,
            days_per_month: 30.0,
        }
    }
}

/// Base values of the compute model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComputeBase {
    pub base_cores: f64,
    pub base_ram_gb: f64,
    pub per_asset_core: f64,
    pub per_asset_ram_gb: f64,
    pub process_data_base_mb: f64, // MB per month
    pub default_retention_months: f64,
    pub default_environment_factor: f64,
}

impl Default for ComputeBase {
    fn default() -> Self {
        Self {
            base_cores: 8.0,
            base_ram_gb: 16.0,
            per_asset_core: 0.05,
            per_asset_ram_gb: 0.1,
            process_data_base_mb: 100.0,
            default_retention_months: 6.0,
            default_environment_factor: 1.0,
        }
    }
}

/// One row of the CPU recommendation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpuTier {
    pub max_cores: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageInputs {
    pub assets: f64,
    pub tags_per_asset: f64,
    pub updates_per_min_per_tag: f64,
    pub retention_months: f64,
    pub row_size_bytes: f64,
    pub compression_ratio: f64,
}

impl StorageInputs {
    pub fn from_defaults(defaults: &StorageDefaults) -> Self {
        Self {
            assets: defaults.assets,
            tags_per_asset: defaults.tags_per_asset,
            updates_per_min_per_tag: defaults.updates_per_min_per_tag,
            retention_months: defaults.retention_months,
            row_size_bytes: defaults.row_size_bytes,
            compression_ratio: defaults.compression_ratio,
        }
    }
}

/// Historian storage footprint for one set of inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageResult {
    pub total_tags: f64,
    pub updates_per_minute: f64,
    pub events_per_day: f64,
    pub total_days: f64,
    pub total_rows: f64,
    pub uncompressed_bytes: f64,
    pub compressed_bytes: f64,
    pub uncompressed_gb: f64,
    pub uncompressed_tb: f64,
    pub compressed_gb: f64,
    pub compressed_tb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeInputs {
    pub assets: f64,
    pub retention_months: f64,
    pub environment_factor: f64,
    pub enabled_module_ids: Vec<String>,
}

/// Compute resources for one set of inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeResult {
    pub cores: f64,
    pub ram_gb: f64,
    pub process_storage_gb: f64,
    pub process_storage_mb: f64,
    pub base_cores: f64,
    pub base_ram_gb: f64,
    pub core_factor_sum: f64,
    pub ram_factor_sum: f64,
    pub added_storage_per_asset_sum: f64,
    pub core_multiplier: f64,
    pub ram_multiplier: f64,
    pub enabled_modules: Vec<String>,
    pub recommended_cpu: String,
}
