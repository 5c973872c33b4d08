//! # Pricing Hex
//!
//! Application core and HTTP adapter for storefront price display.
//!
//! ## Architecture
//!
//! - `service/` - `CurrencyService`: rate cache, refresh guard, conversion, formatting
//! - `scheduler/`, `session/` - periodic refresh bound to a viewer session
//! - `display/` - read-only `PriceDisplay` handles for UI consumers
//! - `preference/` - viewer currency preference resolution
//! - `countries/` - sign-up country list with default currencies
//! - `inbound/` - HTTP adapter (Axum) serving the `get-exchange-rates` proxy
//!
//! The service is generic over `S: RateSource`, so the upstream provider, the
//! proxy client or a fixed table can be injected.

pub mod countries;
pub mod display;
pub mod inbound;
pub mod openapi;
pub mod preference;
pub mod scheduler;
pub mod service;
pub mod session;

#[cfg(test)]
mod service_tests;

pub use countries::CountryDirectory;
pub use display::{PriceDisplay, PriceFormatter};
pub use preference::{NoPreferences, UserCurrencyPreference};
pub use scheduler::{DEFAULT_REFRESH_PERIOD, RefreshScheduler};
pub use service::{CurrencyService, DEFAULT_REFRESH_TIMEOUT, RefreshOutcome};
pub use session::CurrencySession;
