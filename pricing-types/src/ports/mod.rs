//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod countries;
mod preferences;
mod rates;

pub use countries::{CountryError, CountrySource};
pub use preferences::{PreferenceError, PreferenceStore};
pub use rates::{RateFetchError, RateSource};
