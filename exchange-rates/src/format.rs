//! Price string rendering.
//!
//! Output must match the storefront byte for byte: fixed-point amounts follow
//! ECMAScript `Number.prototype.toFixed` (exact binary ties round up, not to
//! even) and whole amounts are grouped the way the `en-US` locale groups them.

use crate::{CurrencyCode, DisplayRule};

/// Renders an already converted amount in `code`'s display rule.
///
/// Negative amounts keep the sign after the symbol (`$-5.00`); callers that
/// display prices reject them before getting here.
pub fn format_amount(code: CurrencyCode, amount: f64) -> String {
    let body = match code.display() {
        DisplayRule::Fixed2 => to_fixed(amount, 2),
        DisplayRule::WholeGrouped => {
            let rounded = amount.abs().round();
            let sign = if amount < 0.0 && rounded != 0.0 { "-" } else { "" };
            // f64 `Display` prints an integral value as plain shortest digits.
            format!("{}{}", sign, group_digits(&rounded.to_string()))
        }
    };
    format!("{}{}", code.symbol(), body)
}

/// Magnitude from which `toFixed` falls back to exponential notation.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Fixed-point rendering with `toFixed` rounding.
///
/// Magnitudes of `1e21` and above render as `toFixed` renders them, in
/// exponential form (`1e+21`).
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_THRESHOLD {
        return exponential(value);
    }

    let factor = 10f64.powi(digits as i32);
    let scaled = magnitude * factor;

    let body = if scaled.fract() == 0.5 && is_exact_tie(magnitude, digits) {
        // `{:.N}` would round this one to even; toFixed picks the larger neighbour.
        let units = scaled.ceil() as u64;
        let unit = 10u64.pow(digits as u32);
        if digits == 0 {
            units.to_string()
        } else {
            format!("{}.{:0width$}", units / unit, units % unit, width = digits)
        }
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// A decimal tie at `digits` places is only representable when the value is a
/// multiple of `2^-(digits + 1)`; multiplying by a power of two is exact.
fn is_exact_tie(magnitude: f64, digits: usize) -> bool {
    (magnitude * 2f64.powi(digits as i32 + 1)).fract() == 0.0
}

/// Shortest round-trip digits in `d.ddde+N` form.
fn exponential(value: f64) -> String {
    let repr = format!("{:e}", value);
    match repr.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => repr,
    }
}

/// Groups digits in threes with `,`: `1234567` → `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
