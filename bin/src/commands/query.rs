//! Resampled candle lookup.

use crate::context::Settings;
use anyhow::{Context, Result};
use candlewatch_lib::prelude::*;

/// Prints the latest `limit` buckets of `interval` for `symbol` as JSON.
pub(crate) async fn query(
    settings: &Settings,
    symbol: &str,
    interval: &str,
    limit: u32,
) -> Result<()> {
    let interval: Interval = interval.parse()?;
    let store = settings.open_store().await?;

    let symbol = symbol.trim().to_uppercase();
    let buckets = Resampler::new(store.clone())
        .resample(&symbol, interval, limit)
        .await
        .with_context(|| format!("Failed to read candles for {symbol}"))?;

    println!("{}", serde_json::to_string_pretty(&buckets)?);
    tracing::info!(%symbol, %interval, buckets = buckets.len(), "query complete");

    store.close().await;
    Ok(())
}
