//! Currency Application Service
//!
//! Owns the rate cache of one viewer session: refreshes it from a
//! `RateSource`, converts USD prices into the active currency and renders
//! them. Readers never wait on a refresh and never observe a partial table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use exchange_rates::{BASE_CURRENCY, CurrencyCode, format_amount};
use pricing_types::{
    PreferenceStore, PriceUsd, PricingError, RateFetchError, RateSource, RateTable, ViewerId,
};

use crate::preference::UserCurrencyPreference;

/// Upper bound on a single refresh; a hung provider call must not hold the
/// in-flight guard forever.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// What one `refresh()` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A new table replaced the previous one.
    Updated,
    /// Another refresh was already in flight; nothing was fetched.
    Skipped,
    /// The fetch failed; the previous table is still in use.
    Failed(RateFetchError),
    /// The session ended before or while fetching; nothing was committed.
    Discarded,
}

/// Application service for multi-currency price display.
///
/// Generic over `S: RateSource` - the adapter is injected at compile time.
pub struct CurrencyService<S: RateSource> {
    source: S,
    refresh_timeout: Duration,
    active: RwLock<CurrencyCode>,
    rates: RwLock<Arc<RateTable>>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
    refresh_in_flight: AtomicBool,
    preference: OnceCell<CurrencyCode>,
    closed: AtomicBool,
}

/// Clears the in-flight flag when the refresh completes, times out, or its
/// future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl<S: RateSource> CurrencyService<S> {
    /// Creates a service showing USD with the base table `{USD: 1.0}`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            active: RwLock::new(BASE_CURRENCY),
            rates: RwLock::new(Arc::new(RateTable::base())),
            last_refresh: RwLock::new(None),
            refresh_in_flight: AtomicBool::new(false),
            preference: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Returns a reference to the underlying rate source.
    pub fn source(&self) -> &S {
        &self.source
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves the viewer's preferred currency. Only the first call consults
    /// the store; concurrent callers wait for it, and every caller gets the
    /// active currency once resolution is done.
    pub async fn load_preference<P: PreferenceStore>(
        &self,
        preferences: &UserCurrencyPreference<P>,
        viewer: Option<&ViewerId>,
    ) -> CurrencyCode {
        self.preference
            .get_or_init(|| async {
                let code = preferences.resolve_preference(viewer).await;
                *write(&self.active) = code;
                tracing::debug!(currency = %code, "Active currency resolved");
                code
            })
            .await;
        self.active_currency()
    }

    /// Resolves the preference once, then performs the initial refresh.
    ///
    /// Conversions made before this completes use the base table.
    pub async fn initialize<P: PreferenceStore>(
        &self,
        preferences: &UserCurrencyPreference<P>,
        viewer: Option<&ViewerId>,
    ) -> RefreshOutcome {
        self.load_preference(preferences, viewer).await;
        self.refresh().await
    }

    /// Fetches a new table and swaps it in whole.
    ///
    /// At most one refresh runs at a time; a concurrent call returns
    /// `Skipped` without fetching. Failures keep the previous table and are
    /// only reported through tracing and the returned outcome.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.is_closed() {
            return RefreshOutcome::Discarded;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.refresh_in_flight) else {
            tracing::debug!("Refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        let result = match tokio::time::timeout(self.refresh_timeout, self.source.fetch_rates()).await
        {
            Ok(result) => result,
            Err(_) => Err(RateFetchError::Timeout(self.refresh_timeout)),
        };

        match result {
            Ok(table) => {
                if self.is_closed() {
                    tracing::debug!("Session ended during refresh, discarding rates");
                    return RefreshOutcome::Discarded;
                }
                let table = if table.is_complete() {
                    table
                } else {
                    tracing::warn!(
                        missing = ?table.missing_codes(),
                        "Provider omitted rates; those currencies display unconverted"
                    );
                    table.with_missing_unconverted()
                };
                let entries = table.len();
                *write(&self.rates) = Arc::new(table);
                *write(&self.last_refresh) = Some(Utc::now());
                tracing::info!(entries, "Exchange rates refreshed");
                RefreshOutcome::Updated
            }
            Err(err) => {
                tracing::error!(error = %err, "Error fetching exchange rates, keeping previous table");
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Ends the session: pending and future refreshes commit nothing.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_in_flight.load(Ordering::Acquire)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion & Formatting
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn active_currency(&self) -> CurrencyCode {
        *read(&self.active)
    }

    /// Switches the display currency. Unsupported codes leave it unchanged.
    pub fn set_active_currency(&self, code: &str) -> Result<CurrencyCode, PricingError> {
        let code: CurrencyCode = code.parse()?;
        *write(&self.active) = code;
        Ok(code)
    }

    /// Snapshot of the last committed table.
    pub fn rates(&self) -> Arc<RateTable> {
        Arc::clone(&read(&self.rates))
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        *read(&self.last_refresh)
    }

    /// USD amount in the active currency.
    pub fn convert(&self, amount_usd: f64) -> Result<f64, PricingError> {
        let amount = PriceUsd::new(amount_usd)?;
        Ok(self.rates().convert(amount, self.active_currency()))
    }

    /// USD amount rendered in the active currency, e.g. `¥14,950`.
    pub fn format_price(&self, amount_usd: f64) -> Result<String, PricingError> {
        let amount = PriceUsd::new(amount_usd)?;
        let currency = self.active_currency();
        let converted = self.rates().convert(amount, currency);
        Ok(format_amount(currency, converted))
    }
}
