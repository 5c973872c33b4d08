//! Periodic rate refresh bound to a service's lifetime.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use pricing_types::RateSource;

use crate::service::CurrencyService;

/// Rates are refreshed hourly.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Background task calling `refresh()` every `period`, starting immediately.
///
/// Cancelled by `cancel()` or on drop; an in-progress refresh is dropped with
/// it and commits nothing.
pub struct RefreshScheduler {
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn spawn<S: RateSource>(service: Arc<CurrencyService<S>>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if service.is_closed() {
                    break;
                }
                // Outcome is already reported by the service.
                let _ = service.refresh().await;
            }
            tracing::debug!("Refresh schedule stopped");
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.abort();
    }
}
