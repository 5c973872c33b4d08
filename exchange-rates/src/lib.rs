//! Storefront Currency Catalog
//!
//! The closed set of display currencies, their symbols and names, the rule used
//! to render a price in each of them, and reference rates for development and
//! offline use. Currencies are declared once in the `define_currencies!` table
//! and every lookup is generated from it.
//!
//! # Adding a New Currency
//! Add a row to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     GBP => ("GBP", "£", "British Pound", Fixed2, 0.79),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{CurrencyCode, format_amount};
//!
//! let yen: CurrencyCode = "jpy".parse().unwrap();
//! assert_eq!(format_amount(yen, 14950.0), "¥14,950");
//! assert_eq!(format_amount(CurrencyCode::EUR, 9.2), "€9.20");
//! ```

mod format;

use std::collections::HashMap;

pub use format::{format_amount, group_thousands, to_fixed};

/// The currency every canonical price is stored in.
pub const BASE_CURRENCY: CurrencyCode = CurrencyCode::USD;

/// How a converted amount is rendered after the currency symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRule {
    /// Exactly two decimals, e.g. `$100.00`.
    Fixed2,
    /// Rounded to a whole number and grouped by thousands, e.g. `¥14,950`.
    WholeGrouped,
}

/// Returned when a string does not name a supported currency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the CurrencyCode enum and its static lookup tables
// ─────────────────────────────────────────────────────────────────────────────

/// Defines the supported currencies and every per-code lookup.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Variant => ("CODE", "SYMBOL", "Display name", DisplayRule, reference_rate_per_usd),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $display_name:literal, $rule:ident, $reference:expr)
        ),* $(,)?
    ) => {
        /// A supported display currency.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            /// ISO 4217 code.
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            /// Human readable name, e.g. "Philippine Peso".
            pub fn name(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $display_name),*
                }
            }

            pub fn display(&self) -> DisplayRule {
                match self {
                    $(CurrencyCode::$name => DisplayRule::$rule),*
                }
            }

            /// Units of this currency per one USD used for development and offline mode.
            pub fn reference_rate(&self) -> f64 {
                match self {
                    $(CurrencyCode::$name => $reference),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = UnknownCurrency;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(UnknownCurrency(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "$", "US Dollar", Fixed2, 1.0),
    PHP => ("PHP", "₱", "Philippine Peso", Fixed2, 56.0),
    JPY => ("JPY", "¥", "Japanese Yen", WholeGrouped, 149.5),
    CAD => ("CAD", "C$", "Canadian Dollar", Fixed2, 1.35),
    EUR => ("EUR", "€", "Euro", Fixed2, 0.92),
}

impl CurrencyCode {
    pub fn is_base(&self) -> bool {
        *self == BASE_CURRENCY
    }
}

/// Comma separated code list in declaration order, as sent in the `symbols` query parameter.
pub fn symbols_param() -> String {
    CurrencyCode::all()
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(",")
}

/// Reference multipliers for every supported currency, relative to USD.
pub fn reference_rates() -> HashMap<CurrencyCode, f64> {
    CurrencyCode::all()
        .iter()
        .map(|&c| (c, c.reference_rate()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!("php".parse::<CurrencyCode>().unwrap(), CurrencyCode::PHP);
        assert_eq!(" eur ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
    }

    #[test]
    fn test_unknown_currency_keeps_input() {
        let err = "XYZ".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err, UnknownCurrency("XYZ".into()));
        assert_eq!(err.to_string(), "Unsupported currency: XYZ");
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::CAD.to_string(), "CAD");
    }

    #[test]
    fn test_symbol_and_name_table() {
        assert_eq!(CurrencyCode::USD.symbol(), "$");
        assert_eq!(CurrencyCode::PHP.symbol(), "₱");
        assert_eq!(CurrencyCode::JPY.symbol(), "¥");
        assert_eq!(CurrencyCode::CAD.symbol(), "C$");
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
        assert_eq!(CurrencyCode::PHP.name(), "Philippine Peso");
    }

    #[test]
    fn test_only_yen_is_whole_grouped() {
        for code in CurrencyCode::all() {
            let expected = if *code == CurrencyCode::JPY {
                DisplayRule::WholeGrouped
            } else {
                DisplayRule::Fixed2
            };
            assert_eq!(code.display(), expected, "{code}");
        }
    }

    #[test]
    fn test_currency_code_all() {
        assert_eq!(CurrencyCode::all().len(), 5);
        assert_eq!(symbols_param(), "USD,PHP,JPY,CAD,EUR");
    }

    #[test]
    fn test_reference_rates_cover_all_codes() {
        let rates = reference_rates();
        assert_eq!(rates.get(&CurrencyCode::USD), Some(&1.0));
        assert!(CurrencyCode::all().iter().all(|c| rates[c] > 0.0));
    }

    #[test]
    fn test_serde_uses_iso_codes() {
        let json = serde_json::to_string(&CurrencyCode::JPY).unwrap();
        assert_eq!(json, "\"JPY\"");
        let parsed: CurrencyCode = serde_json::from_str("\"CAD\"").unwrap();
        assert_eq!(parsed, CurrencyCode::CAD);
    }
}
