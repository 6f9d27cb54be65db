//! Per-tick reconciliation of stored series against the feed.

use candlewatch_fetch::{KlineFeed, KlineRequest};
use candlewatch_store::CandleStore;
use candlewatch_types::{Interval, now_millis};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;

use crate::{ReconcileReport, SymbolReport, SymbolSync, SyncAction, SyncConfig, SyncError};

/// Keeps the candle store current for a set of symbols.
#[derive(Debug, Clone)]
pub struct Reconciler {
    feed: Arc<dyn KlineFeed>,
    store: Arc<dyn CandleStore>,
    config: SyncConfig,
}

impl Reconciler {
    /// Creates a reconciler.
    #[must_use]
    pub fn new(feed: Arc<dyn KlineFeed>, store: Arc<dyn CandleStore>, config: SyncConfig) -> Self {
        Self {
            feed,
            store,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Decides what a symbol needs given its latest stored open time.
    #[must_use]
    pub const fn plan(&self, latest: Option<i64>, now: i64) -> SyncAction {
        let period = Interval::BASE.millis();
        match latest {
            None => SyncAction::ColdStart {
                from: now - self.config.backfill_periods * period,
            },
            Some(latest) if now - latest >= period => SyncAction::Incremental { from: latest },
            Some(_) => SyncAction::Fresh,
        }
    }

    /// Reconciles every symbol against the current time.
    pub async fn reconcile<S: AsRef<str>>(&self, symbols: &[S]) -> ReconcileReport {
        self.reconcile_at(symbols, now_millis()).await
    }

    /// Reconciles every symbol as of `now` (epoch ms).
    ///
    /// Repeated symbols are reconciled once. A failing symbol is recorded in
    /// the report and never stops the others.
    pub async fn reconcile_at<S: AsRef<str>>(&self, symbols: &[S], now: i64) -> ReconcileReport {
        let mut seen = HashSet::new();
        let unique: Vec<String> = symbols
            .iter()
            .map(|s| s.as_ref().to_string())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        let concurrency = self.config.concurrency.max(1);
        let reports: Vec<SymbolReport> = stream::iter(unique)
            .map(|symbol| async move {
                let result = self.reconcile_symbol_at(&symbol, now).await;
                match &result {
                    Ok(sync) => {
                        tracing::debug!(
                            symbol = %symbol,
                            action = ?sync.action,
                            fetched = sync.fetched,
                            "symbol reconciled"
                        );
                        if !self.config.throttle.is_zero() {
                            tokio::time::sleep(self.config.throttle).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            symbol = %symbol,
                            error = %e,
                            "symbol reconciliation failed"
                        );
                    }
                }
                SymbolReport { symbol, result }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let report = ReconcileReport { symbols: reports };
        tracing::info!(
            symbols = report.symbols.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            fetched = report.fetched(),
            "reconciliation pass complete"
        );
        report
    }

    /// Reconciles one symbol as of `now` (epoch ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup, the fetch or the upsert fails.
    pub async fn reconcile_symbol_at(
        &self,
        symbol: &str,
        now: i64,
    ) -> Result<SymbolSync, SyncError> {
        let latest = self.store.latest_open_time(symbol).await?;
        let action = self.plan(latest, now);

        let request = match action {
            SyncAction::Fresh => {
                return Ok(SymbolSync { action, fetched: 0 });
            }
            SyncAction::ColdStart { from } => {
                KlineRequest::new(symbol, Interval::BASE, self.config.backfill_limit)
                    .starting_at(from)
            }
            SyncAction::Incremental { from } => {
                KlineRequest::new(symbol, Interval::BASE, self.config.incremental_limit)
                    .starting_at(from)
            }
        };

        let candles = self.feed.fetch_klines(&request).await?;
        self.store.upsert_batch(symbol, &candles).await?;

        Ok(SymbolSync {
            action,
            fetched: candles.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use candlewatch_fetch::FetchError;
    use candlewatch_store::{MemoryCandleStore, RangeQuery};
    use candlewatch_types::Candle;
    use std::sync::Mutex;
    use std::time::Duration;

    const FIVE_MIN: i64 = 300_000;
    // 2024-01-01 00:00:00 UTC, one minute past a base boundary.
    const NOW: i64 = 1_704_067_200_000 + 60_000;

    /// Serves a gap-free synthetic series up to `now`.
    #[derive(Debug)]
    struct FakeFeed {
        now: Mutex<i64>,
        fail: Vec<String>,
        requests: Mutex<Vec<KlineRequest>>,
    }

    impl FakeFeed {
        fn new(now: i64) -> Self {
            Self {
                now: Mutex::new(now),
                fail: Vec::new(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, symbol: &str) -> Self {
            self.fail.push(symbol.to_string());
            self
        }

        fn set_now(&self, now: i64) {
            *self.now.lock().unwrap() = now;
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl KlineFeed for FakeFeed {
        async fn fetch_klines(&self, request: &KlineRequest) -> Result<Vec<Candle>, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail.contains(&request.symbol) {
                return Err(FetchError::ServerError { status: 503 });
            }

            let now = *self.now.lock().unwrap();
            let start = request.start_time.unwrap_or(now);
            let mut open_time = (start + FIVE_MIN - 1).div_euclid(FIVE_MIN) * FIVE_MIN;
            let mut out = Vec::new();
            while open_time <= now && out.len() < request.limit as usize {
                let price = (open_time / FIVE_MIN % 100) as f64 + 100.0;
                out.push(Candle::new(
                    open_time,
                    open_time + FIVE_MIN - 1,
                    price,
                    price + 1.0,
                    price - 1.0,
                    price,
                    1.0,
                ));
                open_time += FIVE_MIN;
            }
            Ok(out)
        }
    }

    fn reconciler(feed: Arc<FakeFeed>, store: Arc<MemoryCandleStore>) -> Reconciler {
        Reconciler::new(feed, store, SyncConfig::default().with_throttle(Duration::ZERO))
    }

    #[test]
    fn test_plan() {
        let r = reconciler(Arc::new(FakeFeed::new(NOW)), Arc::new(MemoryCandleStore::new()));

        assert_eq!(
            r.plan(None, NOW),
            SyncAction::ColdStart { from: NOW - 1500 * FIVE_MIN }
        );
        assert_eq!(
            r.plan(Some(NOW - FIVE_MIN), NOW),
            SyncAction::Incremental { from: NOW - FIVE_MIN }
        );
        assert_eq!(r.plan(Some(NOW - FIVE_MIN + 1), NOW), SyncAction::Fresh);
    }

    #[tokio::test]
    async fn test_cold_start_then_fresh() {
        let feed = Arc::new(FakeFeed::new(NOW));
        let store = Arc::new(MemoryCandleStore::new());
        let r = reconciler(feed.clone(), store.clone());

        let report = r.reconcile_at(&["BTCUSDT"], NOW).await;
        let outcome = report.get("BTCUSDT").unwrap().result.as_ref().unwrap();
        assert!(matches!(outcome.action, SyncAction::ColdStart { .. }));
        assert_eq!(outcome.fetched, 1500);

        let stored = store.range("BTCUSDT", &RangeQuery::default()).await.unwrap();
        assert_eq!(stored.len(), 1500);
        assert!(stored.windows(2).all(|w| w[1].open_time - w[0].open_time == FIVE_MIN));

        // Same base period: nothing to fetch.
        let report = r.reconcile_at(&["BTCUSDT"], NOW + 60_000).await;
        let outcome = report.get("BTCUSDT").unwrap().result.as_ref().unwrap();
        assert_eq!(outcome.action, SyncAction::Fresh);
        assert_eq!(feed.request_count(), 1);
        assert_eq!(store.count("BTCUSDT").await.unwrap(), 1500);
    }

    #[tokio::test]
    async fn test_incremental_overwrites_latest() {
        let feed = Arc::new(FakeFeed::new(NOW));
        let store = Arc::new(MemoryCandleStore::new());
        let r = reconciler(feed.clone(), store.clone());
        r.reconcile_at(&["ETHUSDT"], NOW).await;
        let latest = store.latest_open_time("ETHUSDT").await.unwrap().unwrap();

        let later = NOW + 2 * FIVE_MIN;
        feed.set_now(later);
        let report = r.reconcile_at(&["ETHUSDT"], later).await;
        let outcome = report.get("ETHUSDT").unwrap().result.as_ref().unwrap();

        assert_eq!(outcome.action, SyncAction::Incremental { from: latest });
        assert_eq!(outcome.fetched, 3);
        assert_eq!(store.count("ETHUSDT").await.unwrap(), 1502);

        let request = feed.requests.lock().unwrap().last().cloned().unwrap();
        assert_eq!(request.limit, 99);
        assert_eq!(request.start_time, Some(latest));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let feed = Arc::new(FakeFeed::new(NOW).failing("BADUSDT"));
        let store = Arc::new(MemoryCandleStore::new());
        let r = reconciler(feed, store.clone());

        let report = r.reconcile_at(&["BTCUSDT", "BADUSDT", "ETHUSDT"], NOW).await;
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.fetched(), 3000);

        let failures: Vec<&str> = report.failures().map(|(s, _)| s).collect();
        assert_eq!(failures, vec!["BADUSDT"]);
        assert_eq!(store.count("BADUSDT").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_symbols_reconciled_once() {
        let feed = Arc::new(FakeFeed::new(NOW));
        let store = Arc::new(MemoryCandleStore::new());
        let r = reconciler(feed.clone(), store);

        let report = r.reconcile_at(&["BTCUSDT", "BTCUSDT", "SOLUSDT", "BTCUSDT"], NOW).await;
        assert_eq!(report.symbols.len(), 2);
        assert_eq!(feed.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_applies_after_success() {
        let feed = Arc::new(FakeFeed::new(NOW));
        let store = Arc::new(MemoryCandleStore::new());
        let r = Reconciler::new(
            feed,
            store,
            SyncConfig::default()
                .with_concurrency(1)
                .with_throttle(Duration::from_millis(200)),
        );

        let started = tokio::time::Instant::now();
        r.reconcile_at(&["A", "B", "C"], NOW).await;
        assert!(started.elapsed() >= Duration::from_millis(600));
    }
}
