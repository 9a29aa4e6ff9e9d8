//! Display formatting for estimate values
//!
//! Non-finite values never reach the user as "NaN" or "inf"; they render as
//! [`PLACEHOLDER`].

pub const PLACEHOLDER: &str = "—";

/// -0.0 prints as "-0"; a zero result should read "0".
fn unsigned_zero(num: f64) -> f64 {
    if num == 0.0 { 0.0 } else { num }
}

/// Format a large count with a B/M/K suffix.
///
/// ```text
/// 51_840_000.0 -> "51.84M"
/// 600.0        -> "600"
/// ```
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let num = unsigned_zero(num);
    if num >= 1e9 {
        format!("{:.2}B", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.2}K", num / 1e3)
    } else {
        format!("{:.0}", num)
    }
}

pub fn format_float(num: f64, decimals: usize) -> String {
    if !num.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.decimals$}", unsigned_zero(num), decimals = decimals)
}

/// TB values are approximate and carry a "~" prefix
pub fn format_approx_tb(tb: f64) -> String {
    if !tb.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("~{:.2} TB", unsigned_zero(tb))
}

/// Half-step quantities (cores, GB) print without trailing zeros: "8.5", "16".
pub fn format_quantity(num: f64) -> String {
    if !num.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}", unsigned_zero(num))
}
