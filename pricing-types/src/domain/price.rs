//! Canonical product price, always in USD.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// A validated USD amount.
///
/// Zero is allowed (free items); negative and non-finite values are rejected so
/// they never reach a price string.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PriceUsd(f64);

impl PriceUsd {
    pub fn new(amount: f64) -> Result<Self, PricingError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(PricingError::InvalidAmount(amount));
        }
        Ok(Self(amount))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PriceUsd {
    type Error = PricingError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<PriceUsd> for f64 {
    fn from(price: PriceUsd) -> Self {
        price.0
    }
}

impl fmt::Display for PriceUsd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
