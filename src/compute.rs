//! Compute resource estimate for a module selection

use crate::catalog::ModuleCatalog;
use crate::models::{ComputeBase, ComputeInputs, ComputeResult, CpuTier};

const MB_PER_GB: f64 = 1024.0;

pub const FALLBACK_CPU: &str = "Intel Xeon Silver 4410Y (Multi-Socket Server)";

/// Round up to the next multiple of 0.5.
///
/// The result `v` satisfies `v >= x` and `v - x < 0.5`, so provisioned
/// capacity is never below the estimate.
pub fn round_to_half_step_ceil(x: f64) -> f64 {
    (x * 2.0).ceil() / 2.0
}

/// Estimate cores, RAM and process-data storage.
///
/// Each of the three outputs is scaled by the environment factor on its own.
/// Process storage scales the base requirement with retention
/// (MB per month times months), the same as the per-module term.
pub fn estimate_compute(
    inputs: &ComputeInputs,
    catalog: &ModuleCatalog,
    base: &ComputeBase,
    cpu_tiers: &[CpuTier],
    fallback_cpu: &str,
) -> ComputeResult {
    let mut core_factor_sum = 0.0;
    let mut ram_factor_sum = 0.0;
    let mut added_storage_per_asset_sum = 0.0;
    let mut enabled_modules = Vec::new();

    for module in catalog.enabled(&inputs.enabled_module_ids) {
        core_factor_sum += module.core_factor;
        ram_factor_sum += module.ram_factor;
        added_storage_per_asset_sum += module.added_storage_per_asset;
        enabled_modules.push(module.name.clone());
    }

    let base_cores = base.base_cores + inputs.assets * base.per_asset_core;
    let base_ram_gb = base.base_ram_gb + inputs.assets * base.per_asset_ram_gb;
    let core_multiplier = 1.0 + core_factor_sum;
    let ram_multiplier = 1.0 + ram_factor_sum;

    let cores = round_to_half_step_ceil(base_cores * core_multiplier * inputs.environment_factor);
    let ram_gb = round_to_half_step_ceil(base_ram_gb * ram_multiplier * inputs.environment_factor);

    let base_storage_mb = base.process_data_base_mb * inputs.retention_months;
    let module_storage_mb = added_storage_per_asset_sum * inputs.assets * inputs.retention_months;
    let process_storage_mb = base_storage_mb + module_storage_mb;
    let process_storage_gb =
        round_to_half_step_ceil((process_storage_mb / MB_PER_GB) * inputs.environment_factor);

    ComputeResult {
        cores,
        ram_gb,
        process_storage_gb,
        process_storage_mb,
        base_cores,
        base_ram_gb,
        core_factor_sum,
        ram_factor_sum,
        added_storage_per_asset_sum,
        core_multiplier,
        ram_multiplier,
        enabled_modules,
        recommended_cpu: recommend_cpu(cores, cpu_tiers, fallback_cpu).to_string(),
    }
}

/// Pick the first tier whose upper bound covers `cores`.
pub fn recommend_cpu<'a>(cores: f64, tiers: &'a [CpuTier], fallback: &'a str) -> &'a str {
    tiers
        .iter()
        .find(|tier| cores <= tier.max_cores)
        .map_or(fallback, |tier| tier.label.as_str())
}

pub fn builtin_cpu_tiers() -> Vec<CpuTier> {
    [
        (4.0, "Intel Core i3-13100 (4 Cores)"),
        (8.0, "Intel Core i5-13500 (14 Cores / 20 Threads)"),
        (16.0, "Intel Core i7-13700 (24 Threads)"),
        (24.0, "Intel Core i9-13900 (32 Threads)"),
    ]
    .into_iter()
    .map(|(max_cores, label)| CpuTier {
        max_cores,
        label: label.to_string(),
    })
    .collect()
}
