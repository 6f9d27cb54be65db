//! In-process candle store.

use async_trait::async_trait;
use candlewatch_types::Candle;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::{CandleStore, RangeQuery, StoreError};

/// Candle store held entirely in memory.
///
/// Same semantics as [`crate::SqliteCandleStore`]; nothing survives the
/// process.
#[derive(Debug, Default)]
pub struct MemoryCandleStore {
    series: RwLock<HashMap<String, BTreeMap<i64, Candle>>>,
}

impl MemoryCandleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandleStore for MemoryCandleStore {
    async fn upsert(&self, symbol: &str, candle: &Candle) -> Result<(), StoreError> {
        self.series
            .write()
            .await
            .entry(symbol.to_string())
            .or_default()
            .insert(candle.open_time, *candle);
        Ok(())
    }

    async fn upsert_batch(&self, symbol: &str, candles: &[Candle]) -> Result<u64, StoreError> {
        if candles.is_empty() {
            return Ok(0);
        }
        let mut series = self.series.write().await;
        let entry = series.entry(symbol.to_string()).or_default();
        for candle in candles {
            entry.insert(candle.open_time, *candle);
        }
        Ok(candles.len() as u64)
    }

    async fn latest_open_time(&self, symbol: &str) -> Result<Option<i64>, StoreError> {
        let series = self.series.read().await;
        Ok(series
            .get(symbol)
            .and_then(|s| s.keys().next_back().copied()))
    }

    async fn range(&self, symbol: &str, query: &RangeQuery) -> Result<Vec<Candle>, StoreError> {
        let series = self.series.read().await;
        Ok(series
            .get(symbol)
            .map(|s| query.apply(s.values()))
            .unwrap_or_default())
    }

    async fn count(&self, symbol: &str) -> Result<u64, StoreError> {
        let series = self.series.read().await;
        Ok(series.get(symbol).map_or(0, |s| s.len() as u64))
    }

    async fn symbols(&self) -> Result<Vec<String>, StoreError> {
        let series = self.series.read().await;
        let mut symbols: Vec<String> = series
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(k, _)| k.clone())
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    async fn delete_before(&self, cutoff: i64) -> Result<u64, StoreError> {
        let mut series = self.series.write().await;
        let mut deleted = 0u64;
        for candles in series.values_mut() {
            let keep = candles.split_off(&cutoff);
            deleted += candles.len() as u64;
            *candles = keep;
        }
        Ok(deleted)
    }
}
