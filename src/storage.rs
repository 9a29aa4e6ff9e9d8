//! Historian (time-series) storage estimate
//!
//! Every field is a plain product of the inputs. No input is validated:
//! degenerate values (zero, negative, NaN) flow straight through the
//! arithmetic and the formatter masks anything non-finite.

use crate::models::{StorageInputs, StorageResult};

const MINUTES_PER_DAY: f64 = 60.0 * 24.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const GB_PER_TB: f64 = 1024.0;

/// Estimate the raw and compressed historian footprint
pub fn estimate_storage(inputs: &StorageInputs, days_per_month: f64) -> StorageResult {
    let total_tags = inputs.assets * inputs.tags_per_asset;
    let updates_per_minute = total_tags * inputs.updates_per_min_per_tag;
    let events_per_day = updates_per_minute * MINUTES_PER_DAY;
    let total_days = inputs.retention_months * days_per_month;
    let total_rows = events_per_day * total_days;

    let uncompressed_bytes = total_rows * inputs.row_size_bytes;
    let compressed_bytes = uncompressed_bytes * inputs.compression_ratio;

    let uncompressed_gb = uncompressed_bytes / BYTES_PER_GB;
    let compressed_gb = compressed_bytes / BYTES_PER_GB;

    StorageResult {
        total_tags,
        updates_per_minute,
        events_per_day,
        total_days,
        total_rows,
        uncompressed_bytes,
        compressed_bytes,
        uncompressed_gb,
        uncompressed_tb: uncompressed_gb / GB_PER_TB,
        compressed_gb,
        compressed_tb: compressed_gb / GB_PER_TB,
    }
}
