//! One viewer's pricing session.

use std::sync::Arc;
use std::time::Duration;

use pricing_types::{PreferenceStore, RateSource, ViewerId};

use crate::display::PriceDisplay;
use crate::preference::UserCurrencyPreference;
use crate::scheduler::RefreshScheduler;
use crate::service::{CurrencyService, RefreshOutcome};

/// Owns a `CurrencyService` and its refresh schedule.
///
/// Only the session may end the service; consumers get `PriceDisplay` handles.
pub struct CurrencySession<S: RateSource> {
    service: Arc<CurrencyService<S>>,
    scheduler: Option<RefreshScheduler>,
}

impl<S: RateSource> CurrencySession<S> {
    /// Resolves the viewer's currency, then schedules refreshes with the first
    /// one running immediately in the background.
    pub async fn start<P: PreferenceStore>(
        service: CurrencyService<S>,
        preferences: &UserCurrencyPreference<P>,
        viewer: Option<&ViewerId>,
        period: Duration,
    ) -> Self {
        let service = Arc::new(service);
        service.load_preference(preferences, viewer).await;
        let scheduler = RefreshScheduler::spawn(Arc::clone(&service), period);
        tracing::info!(currency = %service.active_currency(), ?period, "Pricing session started");
        Self {
            service,
            scheduler: Some(scheduler),
        }
    }

    pub fn display(&self) -> PriceDisplay {
        PriceDisplay::new(self.service.clone())
    }

    pub fn service(&self) -> &Arc<CurrencyService<S>> {
        &self.service
    }

    /// User-initiated refresh; dropped if the scheduled one is still running.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        self.service.refresh().await
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.as_ref().is_some_and(RefreshScheduler::is_running)
    }

    /// Cancels the schedule and closes the service.
    pub fn end(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.cancel();
            self.service.close();
            tracing::info!("Pricing session ended");
        }
    }
}

impl<S: RateSource> Drop for CurrencySession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
