//! CurrencyService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use exchange_rates::CurrencyCode;
    use pricing_types::{
        PreferenceError, PreferenceStore, PricingError, RateFetchError, RateSource, RateTable,
        ViewerId,
    };

    use crate::{
        CurrencyService, CurrencySession, RefreshOutcome, RefreshScheduler,
        UserCurrencyPreference,
    };

    #[derive(Clone)]
    pub enum Behavior {
        Succeed(RateTable),
        Fail(RateFetchError),
        Hang,
    }

    /// Scriptable rate source counting its fetches.
    pub struct MockSource {
        calls: AtomicUsize,
        behavior: Mutex<Behavior>,
        gate: Option<Arc<Notify>>,
    }

    impl MockSource {
        pub fn new(behavior: Behavior) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                behavior: Mutex::new(behavior),
                gate: None,
            }
        }

        pub fn succeeding() -> Self {
            Self::new(Behavior::Succeed(sample_table()))
        }

        /// Each fetch waits for one `notify_one` on the gate before answering.
        pub fn gated(behavior: Behavior, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(behavior)
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn set(&self, behavior: Behavior) {
            *self.behavior.lock().unwrap() = behavior;
        }
    }

    #[async_trait]
    impl RateSource for MockSource {
        async fn fetch_rates(&self) -> Result<RateTable, RateFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                Behavior::Succeed(table) => Ok(table),
                Behavior::Fail(err) => Err(err),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    /// Preference store counting its lookups.
    struct CountingStore {
        loads: AtomicUsize,
        values: HashMap<String, String>,
        latency: Duration,
    }

    impl CountingStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                values: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                latency: Duration::ZERO,
            }
        }

        fn slow(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }
    }

    #[async_trait]
    impl PreferenceStore for CountingStore {
        async fn load_preference(
            &self,
            viewer: &ViewerId,
        ) -> Result<Option<String>, PreferenceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            Ok(self.values.get(viewer.as_str()).cloned())
        }

        async fn save_preference(
            &self,
            _viewer: &ViewerId,
            _currency: CurrencyCode,
        ) -> Result<(), PreferenceError> {
            Ok(())
        }
    }

    pub fn sample_table() -> RateTable {
        RateTable::from_raw(
            [("PHP", 56.0), ("JPY", 149.5), ("CAD", 1.35), ("EUR", 0.92)],
            Some("2024-05-01".into()),
        )
    }

    async fn wait_until_refreshing<S: RateSource>(service: &CurrencyService<S>) {
        while !service.is_refreshing() {
            tokio::task::yield_now().await;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion & formatting
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_base_table_shows_unconverted_amounts() {
        let service = CurrencyService::new(MockSource::succeeding());
        assert_eq!(service.active_currency(), CurrencyCode::USD);

        service.set_active_currency("JPY").unwrap();
        assert_eq!(service.convert(100.0).unwrap(), 100.0);
        assert_eq!(service.format_price(100.0).unwrap(), "¥100");

        service.set_active_currency("PHP").unwrap();
        assert_eq!(service.format_price(100.0).unwrap(), "₱100.00");
    }

    #[tokio::test]
    async fn test_refresh_fills_every_supported_code() {
        let service = CurrencyService::new(MockSource::succeeding());
        assert_eq!(service.refresh().await, RefreshOutcome::Updated);

        let rates = service.rates();
        for code in CurrencyCode::all() {
            assert!(rates.rate(*code) > 0.0);
        }
        assert_eq!(rates.rate(CurrencyCode::USD), 1.0);
        assert!(service.last_refreshed_at().is_some());
    }

    #[tokio::test]
    async fn test_format_examples() {
        let service = CurrencyService::new(MockSource::succeeding());
        service.refresh().await;

        assert_eq!(service.format_price(100.0).unwrap(), "$100.00");
        service.set_active_currency("PHP").unwrap();
        assert_eq!(service.format_price(100.0).unwrap(), "₱5600.00");
        service.set_active_currency("JPY").unwrap();
        assert_eq!(service.format_price(100.0).unwrap(), "¥14,950");
        service.set_active_currency("EUR").unwrap();
        assert_eq!(service.format_price(10.0).unwrap(), "€9.20");
        service.set_active_currency("CAD").unwrap();
        assert_eq!(service.format_price(100.0).unwrap(), "C$135.00");
    }

    #[tokio::test]
    async fn test_usd_is_identity() {
        let service = CurrencyService::new(MockSource::succeeding());
        service.refresh().await;
        for amount in [0.0, 0.01, 12.34, 2499.99] {
            assert_eq!(service.convert(amount).unwrap(), amount);
        }
    }

    #[tokio::test]
    async fn test_zero_amount_is_allowed() {
        let service = CurrencyService::new(MockSource::succeeding());
        assert_eq!(service.format_price(0.0).unwrap(), "$0.00");
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected() {
        let service = CurrencyService::new(MockSource::succeeding());
        assert!(matches!(
            service.convert(-1.0),
            Err(PricingError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.format_price(f64::NAN),
            Err(PricingError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.format_price(f64::INFINITY),
            Err(PricingError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_currency_leaves_active_unchanged() {
        let service = CurrencyService::new(MockSource::succeeding());
        service.set_active_currency("EUR").unwrap();

        let err = service.set_active_currency("XYZ").unwrap_err();
        assert_eq!(err, PricingError::UnsupportedCurrency("XYZ".into()));
        assert_eq!(service.active_currency(), CurrencyCode::EUR);
    }

    #[tokio::test]
    async fn test_set_active_currency_accepts_lowercase() {
        let service = CurrencyService::new(MockSource::succeeding());
        assert_eq!(service.set_active_currency("cad").unwrap(), CurrencyCode::CAD);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Refresh
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_concurrent_refresh_fetches_once() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(CurrencyService::new(MockSource::gated(
            Behavior::Succeed(sample_table()),
            gate.clone(),
        )));

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.refresh().await }
        });
        wait_until_refreshing(&service).await;

        assert_eq!(service.refresh().await, RefreshOutcome::Skipped);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), RefreshOutcome::Updated);
        assert_eq!(service.source().calls(), 1);
        assert!(!service.is_refreshing());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_table() {
        let service = CurrencyService::new(MockSource::succeeding());
        service.refresh().await;
        let before = service.rates();

        service
            .source()
            .set(Behavior::Fail(RateFetchError::Status(503)));
        assert_eq!(
            service.refresh().await,
            RefreshOutcome::Failed(RateFetchError::Status(503))
        );

        assert!(Arc::ptr_eq(&before, &service.rates()));
        service.set_active_currency("JPY").unwrap();
        assert_eq!(service.format_price(100.0).unwrap(), "¥14,950");
    }

    #[tokio::test]
    async fn test_failed_first_refresh_stays_on_base_table() {
        let service = CurrencyService::new(MockSource::new(Behavior::Fail(
            RateFetchError::Provider("Failed to fetch exchange rates from API".into()),
        )));
        assert!(matches!(service.refresh().await, RefreshOutcome::Failed(_)));
        assert_eq!(*service.rates(), RateTable::base());
        assert!(service.last_refreshed_at().is_none());
    }

    #[tokio::test]
    async fn test_timed_out_refresh_releases_guard() {
        let timeout = Duration::from_millis(50);
        let service =
            CurrencyService::new(MockSource::new(Behavior::Hang)).with_refresh_timeout(timeout);

        assert_eq!(
            service.refresh().await,
            RefreshOutcome::Failed(RateFetchError::Timeout(timeout))
        );
        assert!(!service.is_refreshing());

        service.source().set(Behavior::Succeed(sample_table()));
        assert_eq!(service.refresh().await, RefreshOutcome::Updated);
        assert_eq!(service.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_partial_table_leaves_missing_codes_unconverted() {
        let partial = RateTable::from_raw([("EUR", 0.92)], None);
        let service = CurrencyService::new(MockSource::new(Behavior::Succeed(partial)));
        assert_eq!(service.refresh().await, RefreshOutcome::Updated);

        let rates = service.rates();
        for code in CurrencyCode::all() {
            assert!(rates.get(*code).is_some_and(|r| r > 0.0), "{code} has no rate");
        }
        assert_eq!(rates.get(CurrencyCode::EUR), Some(0.92));
        assert_eq!(rates.get(CurrencyCode::JPY), Some(1.0));

        service.set_active_currency("JPY").unwrap();
        assert_eq!(service.format_price(100.0).unwrap(), "¥100");
    }

    #[tokio::test]
    async fn test_result_arriving_after_close_is_discarded() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(CurrencyService::new(MockSource::gated(
            Behavior::Succeed(sample_table()),
            gate.clone(),
        )));

        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.refresh().await }
        });
        wait_until_refreshing(&service).await;

        service.close();
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), RefreshOutcome::Discarded);
        assert_eq!(*service.rates(), RateTable::base());
    }

    #[tokio::test]
    async fn test_refresh_after_close_does_not_fetch() {
        let service = CurrencyService::new(MockSource::succeeding());
        service.close();
        assert_eq!(service.refresh().await, RefreshOutcome::Discarded);
        assert_eq!(service.source().calls(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preference & lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preference_is_loaded_once() {
        let prefs = UserCurrencyPreference::new(CountingStore::with(&[("maria", "PHP")]));
        let viewer = ViewerId::new("maria").unwrap();
        let service = CurrencyService::new(MockSource::succeeding());

        assert_eq!(
            service.load_preference(&prefs, Some(&viewer)).await,
            CurrencyCode::PHP
        );
        service.set_active_currency("EUR").unwrap();
        assert_eq!(
            service.load_preference(&prefs, Some(&viewer)).await,
            CurrencyCode::EUR
        );
        assert_eq!(prefs.store().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_preference_loads_see_resolved_currency() {
        let prefs = UserCurrencyPreference::new(
            CountingStore::with(&[("maria", "PHP")]).slow(Duration::from_millis(50)),
        );
        let viewer = ViewerId::new("maria").unwrap();
        let service = CurrencyService::new(MockSource::succeeding());

        let (first, second) = tokio::join!(
            service.load_preference(&prefs, Some(&viewer)),
            service.load_preference(&prefs, Some(&viewer)),
        );
        assert_eq!(first, CurrencyCode::PHP);
        assert_eq!(second, CurrencyCode::PHP);
        assert_eq!(service.active_currency(), CurrencyCode::PHP);
        assert_eq!(prefs.store().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_initialize_resolves_then_refreshes() {
        let prefs = UserCurrencyPreference::new(CountingStore::with(&[("kenji", "JPY")]));
        let viewer = ViewerId::new("kenji").unwrap();
        let service = CurrencyService::new(MockSource::succeeding());

        assert_eq!(
            service.initialize(&prefs, Some(&viewer)).await,
            RefreshOutcome::Updated
        );
        assert_eq!(service.format_price(100.0).unwrap(), "¥14,950");
    }

    #[tokio::test]
    async fn test_scheduler_repeats_until_cancelled() {
        let service = Arc::new(CurrencyService::new(MockSource::succeeding()));
        let scheduler = RefreshScheduler::spawn(service.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(110)).await;
        assert!(scheduler.is_running());
        assert!(service.source().calls() >= 2);

        scheduler.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let calls = service.source().calls();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(service.source().calls(), calls);
    }

    #[tokio::test]
    async fn test_scheduler_stops_when_service_closes() {
        let service = Arc::new(CurrencyService::new(MockSource::succeeding()));
        let scheduler = RefreshScheduler::spawn(service.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(25)).await;

        service.close();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let prefs = UserCurrencyPreference::new(CountingStore::with(&[("maria", "PHP")]));
        let viewer = ViewerId::new("maria").unwrap();
        let session = CurrencySession::start(
            CurrencyService::new(MockSource::succeeding()),
            &prefs,
            Some(&viewer),
            Duration::from_secs(3600),
        )
        .await;

        let display = session.display();
        assert_eq!(display.currency(), CurrencyCode::PHP);

        // The scheduled initial refresh may still be running.
        let outcome = session.refresh_now().await;
        assert!(matches!(
            outcome,
            RefreshOutcome::Updated | RefreshOutcome::Skipped
        ));
        while session.service().last_refreshed_at().is_none() {
            tokio::task::yield_now().await;
        }
        assert_eq!(display.render(100.0), "₱5600.00");

        let service = session.service().clone();
        session.end();
        assert!(service.is_closed());
        assert_eq!(service.refresh().await, RefreshOutcome::Discarded);

        // Handles outlive the session and keep the last committed table.
        assert_eq!(display.render(100.0), "₱5600.00");
    }

    #[tokio::test]
    async fn test_dropping_session_closes_service() {
        let prefs = UserCurrencyPreference::new(CountingStore::with(&[]));
        let session = CurrencySession::start(
            CurrencyService::new(MockSource::succeeding()),
            &prefs,
            None,
            Duration::from_secs(3600),
        )
        .await;
        let service = session.service().clone();
        drop(session);
        assert!(service.is_closed());
    }
}
