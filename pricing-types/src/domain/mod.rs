//! Domain models for storefront pricing.

pub mod country;
pub mod price;
pub mod rates;
pub mod viewer;

pub use country::{Country, CountryRecord};
pub use price::PriceUsd;
pub use rates::RateTable;
pub use viewer::{StoredPreference, ViewerId};
