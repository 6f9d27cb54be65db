//! Per-pass bullish crossover detection.

use candlewatch_aggregate::{Bucket, Resampler};
use candlewatch_types::Interval;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::gates::{depth_ok, is_bullish_cross, negative_count, rising_steps, trend_ok};
use crate::indicators::{ema, macd};
use crate::{DedupCache, Notifier, SignalError};

/// Prefix of the cooldown key for crossover alerts.
const CROSS_KEY_PREFIX: &str = "bullish_cross_";

/// Indicator periods and gate thresholds.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Resolution the indicators run on.
    pub interval: Interval,
    /// Buckets read per symbol.
    pub lookback: u32,
    /// Trend EMA period.
    pub trend_period: usize,
    /// Steps inspected by the trend gate.
    pub trend_window: usize,
    /// Rising steps required by the trend gate.
    pub trend_min_rising: usize,
    /// MACD fast EMA period.
    pub macd_fast: usize,
    /// MACD slow EMA period.
    pub macd_slow: usize,
    /// MACD signal EMA period.
    pub macd_signal: usize,
    /// Histogram values inspected by the depth gate.
    pub depth_window: usize,
    /// Negative histogram count that rejects a signal.
    pub depth_max_negative: usize,
    /// How long a fired symbol stays suppressed.
    pub cooldown: TimeDelta,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            interval: Interval::Minute15,
            lookback: 300,
            trend_period: 144,
            trend_window: 5,
            trend_min_rising: 4,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            depth_window: 6,
            depth_max_negative: 5,
            cooldown: TimeDelta::hours(4),
        }
    }
}

impl DetectorConfig {
    /// Minimum closed buckets needed to evaluate a symbol.
    #[must_use]
    pub const fn min_history(&self) -> usize {
        self.trend_period + self.macd_slow
    }
}

/// Gate-by-gate outcome for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Closed buckets evaluated.
    pub buckets: usize,
    /// Last close price.
    pub last_close: f64,
    /// Last trend EMA value.
    pub last_ema: f64,
    /// Rising trend-EMA steps in the trend window.
    pub rising_steps: usize,
    /// Trend gate result.
    pub trend_ok: bool,
    /// Last MACD value.
    pub macd: f64,
    /// Last signal value.
    pub signal: f64,
    /// Last histogram value.
    pub histogram: f64,
    /// Negative histogram values in the depth window.
    pub negative_histograms: usize,
    /// Depth gate result.
    pub depth_ok: bool,
    /// Crossover at the last step.
    pub crossed: bool,
}

impl Evaluation {
    /// Returns true if every gate passed.
    #[must_use]
    pub const fn fires(&self) -> bool {
        self.trend_ok && self.depth_ok && self.crossed
    }
}

/// Outcome of one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionReport {
    /// Symbols with enough history to evaluate.
    pub evaluated: usize,
    /// Symbols skipped for lack of history.
    pub insufficient: usize,
    /// Symbols skipped because of a store error.
    pub errors: usize,
    /// Symbols that fired and were included in the message.
    pub fired: Vec<String>,
    /// Symbols that passed every gate but are cooling down.
    pub suppressed: Vec<String>,
    /// The message sent, if any symbol fired.
    pub message: Option<String>,
    /// True if the message was delivered.
    pub notified: bool,
}

/// Formats the batched alert for `symbols`.
#[must_use]
pub fn format_message(interval: Interval, symbols: &[String]) -> String {
    let mut message = format!("MACD bullish crossover above zero on {interval} candles:\n");
    for symbol in symbols {
        message.push_str("- ");
        message.push_str(symbol);
        message.push('\n');
    }
    message
}

fn last(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or_default()
}

/// Scans symbols for bullish crossovers and alerts once per pass.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    resampler: Resampler,
    cache: Arc<DedupCache>,
    notifier: Arc<dyn Notifier>,
    config: DetectorConfig,
}

impl SignalDetector {
    /// Creates a detector.
    #[must_use]
    pub fn new(
        resampler: Resampler,
        cache: Arc<DedupCache>,
        notifier: Arc<dyn Notifier>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            resampler,
            cache,
            notifier,
            config,
        }
    }

    /// Returns the cooldown cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<DedupCache> {
        &self.cache
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs every gate over closed `buckets` (ascending).
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InsufficientHistory`] if fewer than
    /// [`DetectorConfig::min_history`] buckets are given.
    pub fn evaluate(&self, buckets: &[Bucket]) -> Result<Evaluation, SignalError> {
        let cfg = &self.config;
        let need = cfg.min_history();
        if buckets.len() < need {
            return Err(SignalError::InsufficientHistory {
                have: buckets.len(),
                need,
            });
        }

        let closes: Vec<f64> = buckets.iter().map(|b| b.close).collect();
        let trend = ema(&closes, cfg.trend_period);
        let series = macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);

        let negative = negative_count(&series.histogram, cfg.depth_window);

        Ok(Evaluation {
            buckets: buckets.len(),
            last_close: last(&closes),
            last_ema: last(&trend),
            rising_steps: rising_steps(&trend, cfg.trend_window).unwrap_or(0),
            trend_ok: trend_ok(&closes, &trend, cfg.trend_window, cfg.trend_min_rising),
            macd: last(&series.macd),
            signal: last(&series.signal),
            histogram: last(&series.histogram),
            negative_histograms: negative,
            depth_ok: depth_ok(&series.histogram, cfg.depth_window, cfg.depth_max_negative),
            crossed: series.has_signal(2) && is_bullish_cross(&series.macd, &series.signal),
        })
    }

    /// Evaluates `symbol` using only buckets fully closed at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or history is insufficient.
    pub async fn evaluate_symbol_at(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, SignalError> {
        let now_ms = now.timestamp_millis();
        let mut buckets = self
            .resampler
            .resample(symbol, self.config.interval, self.config.lookback)
            .await?;
        buckets.retain(|b| b.is_closed_at(now_ms));
        self.evaluate(&buckets)
    }

    /// Evaluates each symbol without touching the cache or the notifier.
    pub async fn scan_at<S: AsRef<str>>(
        &self,
        symbols: &[S],
        now: DateTime<Utc>,
    ) -> Vec<(String, Result<Evaluation, SignalError>)> {
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.as_ref();
            out.push((symbol.to_string(), self.evaluate_symbol_at(symbol, now).await));
        }
        out
    }

    /// Runs one detection pass against the current time.
    pub async fn detect_all<S: AsRef<str>>(&self, symbols: &[S]) -> DetectionReport {
        self.detect_all_at(symbols, Utc::now()).await
    }

    /// Runs one detection pass as of `now`.
    ///
    /// Firing symbols not already cooling down are claimed in the cache and
    /// sent together in a single message. A failed delivery is logged and the
    /// claims are kept.
    pub async fn detect_all_at<S: AsRef<str>>(
        &self,
        symbols: &[S],
        now: DateTime<Utc>,
    ) -> DetectionReport {
        let mut report = DetectionReport::default();

        for (symbol, result) in self.scan_at(symbols, now).await {
            match result {
                Ok(eval) => {
                    report.evaluated += 1;
                    if !eval.fires() {
                        continue;
                    }
                    let key = format!("{CROSS_KEY_PREFIX}{symbol}");
                    if self.cache.try_claim(&key, now) {
                        tracing::info!(
                            symbol = %symbol,
                            macd = eval.macd,
                            signal = eval.signal,
                            "bullish crossover"
                        );
                        report.fired.push(symbol);
                    } else {
                        tracing::debug!(
                            symbol = %symbol,
                            "bullish crossover suppressed by cooldown"
                        );
                        report.suppressed.push(symbol);
                    }
                }
                Err(SignalError::InsufficientHistory { have, need }) => {
                    tracing::debug!(symbol = %symbol, have, need, "insufficient history");
                    report.insufficient += 1;
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "evaluation failed");
                    report.errors += 1;
                }
            }
        }

        if !report.fired.is_empty() {
            let message = format_message(self.config.interval, &report.fired);
            match self.notifier.notify(&message).await {
                Ok(()) => {
                    tracing::info!(symbols = report.fired.len(), "alert sent");
                    report.notified = true;
                }
                Err(e) => tracing::warn!(error = %e, "failed to send alert"),
            }
            report.message = Some(message);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotifyError;
    use async_trait::async_trait;
    use candlewatch_store::{CandleStore, MemoryCandleStore};
    use candlewatch_types::Candle;
    use std::sync::Mutex;

    const BUCKET: i64 = 900_000;
    const BASE: i64 = 300_000;
    // 2024-01-01 00:00:00 UTC
    const T0: i64 = 1_704_067_200_000;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message.to_string());
            if self.fail {
                return Err(NotifyError::Status {
                    status: 500,
                    body: String::new(),
                });
            }
            Ok(())
        }
    }

    /// Accelerating uptrend with a one-bucket dip and a sharp final recovery.
    fn crossing_closes() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..298)
            .map(|i| {
                let i = f64::from(i);
                100.0 + 0.5 * i + 0.002 * i * i
            })
            .collect();
        let top = closes[297];
        closes.push(top - 1.0);
        closes.push(top + 7.0);
        closes
    }

    fn rising_closes(n: i32) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let i = f64::from(i);
                100.0 + 0.5 * i + 0.002 * i * i
            })
            .collect()
    }

    async fn seed(store: &MemoryCandleStore, symbol: &str, closes: &[f64]) {
        let mut candles = Vec::new();
        for (i, &close) in closes.iter().enumerate() {
            let start = T0 + i as i64 * BUCKET;
            for k in 0..3 {
                let open_time = start + k * BASE;
                candles.push(Candle::new(
                    open_time,
                    open_time + BASE - 1,
                    close,
                    close,
                    close,
                    close,
                    1.0,
                ));
            }
        }
        store.upsert_batch(symbol, &candles).await.unwrap();
    }

    fn ms(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ts).unwrap()
    }

    fn detector(store: Arc<MemoryCandleStore>, notifier: Arc<RecordingNotifier>) -> SignalDetector {
        let config = DetectorConfig::default();
        let cache = Arc::new(DedupCache::new(config.cooldown));
        SignalDetector::new(Resampler::new(store), cache, notifier, config)
    }

    fn after_close(buckets: i64) -> DateTime<Utc> {
        ms(T0 + buckets * BUCKET)
    }

    #[tokio::test]
    async fn test_evaluate_crossing_series() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "BTCUSDT", &crossing_closes()).await;
        let d = detector(store, Arc::new(RecordingNotifier::default()));

        let eval = d.evaluate_symbol_at("BTCUSDT", after_close(300)).await.unwrap();
        assert_eq!(eval.buckets, 300);
        assert_eq!(eval.rising_steps, 5);
        assert!(eval.trend_ok);
        assert!(eval.depth_ok);
        assert!(eval.crossed);
        assert!(eval.fires());
    }

    #[tokio::test]
    async fn test_open_bucket_is_excluded() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "BTCUSDT", &crossing_closes()).await;
        let d = detector(store, Arc::new(RecordingNotifier::default()));

        // The recovery bucket has not closed yet.
        let now = after_close(300) - TimeDelta::milliseconds(2);
        let eval = d.evaluate_symbol_at("BTCUSDT", now).await.unwrap();
        assert_eq!(eval.buckets, 299);
        assert!(!eval.crossed);
    }

    #[tokio::test]
    async fn test_steady_trend_does_not_fire() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "ETHUSDT", &rising_closes(300)).await;
        let d = detector(store, Arc::new(RecordingNotifier::default()));

        let eval = d.evaluate_symbol_at("ETHUSDT", after_close(300)).await.unwrap();
        assert!(eval.trend_ok);
        assert!(!eval.crossed);
        assert!(!eval.fires());
    }

    #[tokio::test]
    async fn test_insufficient_history() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "NEWUSDT", &rising_closes(100)).await;
        let d = detector(store, Arc::new(RecordingNotifier::default()));

        let result = d.evaluate_symbol_at("NEWUSDT", after_close(100)).await;
        assert!(matches!(
            result,
            Err(SignalError::InsufficientHistory { have: 100, need: 170 })
        ));
    }

    #[tokio::test]
    async fn test_single_batched_message() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "BTCUSDT", &crossing_closes()).await;
        seed(&store, "SOLUSDT", &crossing_closes()).await;
        seed(&store, "ETHUSDT", &rising_closes(300)).await;
        seed(&store, "NEWUSDT", &rising_closes(50)).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let d = detector(store, notifier.clone());

        let symbols = ["BTCUSDT", "ETHUSDT", "SOLUSDT", "NEWUSDT"];
        let report = d.detect_all_at(&symbols, after_close(300)).await;

        assert_eq!(report.evaluated, 3);
        assert_eq!(report.insufficient, 1);
        assert_eq!(report.fired, vec!["BTCUSDT", "SOLUSDT"]);
        assert!(report.notified);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            "MACD bullish crossover above zero on 15m candles:\n- BTCUSDT\n- SOLUSDT\n"
        );
    }

    #[tokio::test]
    async fn test_cooldown_suppresses_then_expires() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "BTCUSDT", &crossing_closes()).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let d = detector(store, notifier.clone());
        let now = after_close(300);

        let first = d.detect_all_at(&["BTCUSDT"], now).await;
        assert_eq!(first.fired, vec!["BTCUSDT"]);

        let second = d.detect_all_at(&["BTCUSDT"], now + TimeDelta::hours(1)).await;
        assert!(second.fired.is_empty());
        assert_eq!(second.suppressed, vec!["BTCUSDT"]);
        assert!(second.message.is_none());

        let third = d.detect_all_at(&["BTCUSDT"], now + TimeDelta::hours(4)).await;
        assert_eq!(third.fired, vec!["BTCUSDT"]);

        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_claim() {
        let store = Arc::new(MemoryCandleStore::new());
        seed(&store, "BTCUSDT", &crossing_closes()).await;
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        });
        let d = detector(store, notifier);
        let now = after_close(300);

        let report = d.detect_all_at(&["BTCUSDT"], now).await;
        assert!(!report.notified);
        assert!(report.message.is_some());
        assert!(d.cache().is_live("bullish_cross_BTCUSDT", now));
    }

    #[test]
    fn test_format_message() {
        let msg = format_message(Interval::Minute15, &["ADAUSDT".to_string()]);
        assert_eq!(msg, "MACD bullish crossover above zero on 15m candles:\n- ADAUSDT\n");
    }
}
