//! # Pricing Types
//!
//! Domain types and port traits for storefront price display.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Rate tables, USD prices, viewers, countries
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Wire shapes of the exchange-rate proxy
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Country, CountryRecord, PriceUsd, RateTable, StoredPreference, ViewerId};
pub use dto::*;
pub use error::{AppError, PricingError};
pub use exchange_rates::{BASE_CURRENCY, CurrencyCode, DisplayRule};
pub use ports::{
    CountryError, CountrySource, PreferenceError, PreferenceStore, RateFetchError, RateSource,
};
