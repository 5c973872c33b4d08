//! Viewer identity and the stored currency preference.

use std::fmt;
use std::str::FromStr;

use exchange_rates::{BASE_CURRENCY, CurrencyCode};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Identifier of a signed-in viewer (the auth provider's user id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(String);

impl ViewerId {
    pub fn new(id: impl Into<String>) -> Result<Self, PricingError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(PricingError::InvalidViewer);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ViewerId {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interpretation of a viewer's `currency_preference` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPreference {
    Absent,
    Supported(CurrencyCode),
    /// A value outside the supported set; treated like `Absent`.
    Unsupported(String),
}

impl StoredPreference {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => StoredPreference::Absent,
            Some(value) => match value.parse::<CurrencyCode>() {
                Ok(code) => StoredPreference::Supported(code),
                Err(_) => StoredPreference::Unsupported(value.to_string()),
            },
        }
    }

    /// The display currency this preference resolves to.
    pub fn currency(&self) -> CurrencyCode {
        match self {
            StoredPreference::Supported(code) => *code,
            StoredPreference::Absent | StoredPreference::Unsupported(_) => BASE_CURRENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_id_trims() {
        let id = ViewerId::new("  3f2a-user ").unwrap();
        assert_eq!(id.as_str(), "3f2a-user");
    }

    #[test]
    fn test_blank_viewer_id_fails() {
        assert!(matches!(ViewerId::new("   "), Err(PricingError::InvalidViewer)));
    }

    #[test]
    fn test_absent_preference_is_usd() {
        assert_eq!(StoredPreference::parse(None), StoredPreference::Absent);
        assert_eq!(StoredPreference::parse(Some("")), StoredPreference::Absent);
        assert_eq!(StoredPreference::parse(None).currency(), CurrencyCode::USD);
    }

    #[test]
    fn test_supported_preference() {
        let pref = StoredPreference::parse(Some("jpy"));
        assert_eq!(pref, StoredPreference::Supported(CurrencyCode::JPY));
        assert_eq!(pref.currency(), CurrencyCode::JPY);
    }

    #[test]
    fn test_unsupported_preference_falls_back() {
        let pref = StoredPreference::parse(Some("GBP"));
        assert_eq!(pref, StoredPreference::Unsupported("GBP".into()));
        assert_eq!(pref.currency(), CurrencyCode::USD);
    }
}
