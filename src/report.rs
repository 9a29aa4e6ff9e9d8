//! Human-readable and JSON rendering of estimates

use std::fmt;

use serde::Serialize;

use crate::format::{format_approx_tb, format_float, format_number, format_quantity};
use crate::models::{ComputeResult, StorageResult};

/// What a single CLI run produced
#[derive(Debug, Default, Serialize)]
pub struct EstimateReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeResult>,
}

impl EstimateReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EstimateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(storage) = &self.storage {
            write!(f, "{}", storage)?;
        }
        if self.storage.is_some() && self.compute.is_some() {
            writeln!(f)?;
        }
        if let Some(compute) = &self.compute {
            write!(f, "{}", compute)?;
        }
        Ok(())
    }
}

impl fmt::Display for StorageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Historian Storage ===")?;
        writeln!(f, "Total tags:        {}", format_number(self.total_tags))?;
        writeln!(f, "Events per day:    {}", format_number(self.events_per_day))?;
        writeln!(f, "Total rows:        {}", format_number(self.total_rows))?;
        writeln!(f)?;
        writeln!(
            f,
            "Uncompressed:      {} GB ({})",
            format_float(self.uncompressed_gb, 2),
            format_approx_tb(self.uncompressed_tb)
        )?;
        writeln!(
            f,
            "Compressed:        {} GB ({})",
            format_float(self.compressed_gb, 2),
            format_approx_tb(self.compressed_tb)
        )?;
        Ok(())
    }
}

impl fmt::Display for ComputeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Compute Resources ===")?;
        writeln!(f, "Enabled modules:")?;
        for name in &self.enabled_modules {
            writeln!(f, "  • {}", name)?;
        }
        writeln!(f)?;

        writeln!(f, "Base cores:        {}", format_float(self.base_cores, 2))?;
        writeln!(f, "Core multiplier:   {}", format_float(self.core_multiplier, 2))?;
        writeln!(f, "Base RAM:          {} GB", format_float(self.base_ram_gb, 2))?;
        writeln!(f, "RAM multiplier:    {}", format_float(self.ram_multiplier, 2))?;
        writeln!(f)?;

        writeln!(f, "CPU cores:         {}", format_quantity(self.cores))?;
        writeln!(f, "RAM:               {} GB", format_quantity(self.ram_gb))?;
        writeln!(
            f,
            "Process storage:   {} GB",
            format_quantity(self.process_storage_gb)
        )?;
        writeln!(f, "Recommended CPU:   {}", self.recommended_cpu)?;
        Ok(())
    }
}
