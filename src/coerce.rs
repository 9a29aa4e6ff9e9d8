//! Numeric coercion of raw form input
//!
//! Follows the browser's `Number(text)` conversion so that the CLI behaves
//! like the original form: blank means 0, garbage means NaN. NaN is not an
//! error here; it flows through the estimators and renders as a placeholder.

/// Coerce user text to a number.
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed_integer(text) {
        return value;
    }

    // Rust also accepts "inf"/"nan" spellings, which the browser does not
    let is_decimal_literal = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal_literal {
        return f64::NAN;
    }

    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x`, `0o` and `0b` literals; unsigned only.
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let lower = text.get(..2)?.to_ascii_lowercase();
    let radix = match lower.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let mut value = 0.0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

/// clap value parser: never rejects, so bad input surfaces as a placeholder
pub fn parse_lenient(raw: &str) -> Result<f64, std::convert::Infallible> {
    Ok(coerce_number(raw))
}
