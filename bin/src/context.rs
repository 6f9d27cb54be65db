//! Service construction shared by the commands.

use anyhow::{Context, Result};
use candlewatch_lib::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Global settings resolved from flags and environment.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database: PathBuf,
    pub(crate) symbols: PathBuf,
    pub(crate) feed_url: Option<String>,
    pub(crate) telegram_token: Option<String>,
    pub(crate) telegram_chat_id: Option<String>,
}

impl Settings {
    /// Reads the symbol list file.
    pub(crate) fn load_symbols(&self) -> Result<SymbolList> {
        SymbolList::load(&self.symbols)
            .with_context(|| format!("Failed to load symbols from {}", self.symbols.display()))
    }

    /// Opens (creating if needed) the candle database.
    pub(crate) async fn open_store(&self) -> Result<Arc<SqliteCandleStore>> {
        let store = SqliteCandleStore::open(&StoreConfig::new(&self.database))
            .await
            .with_context(|| format!("Failed to open database {}", self.database.display()))?;
        Ok(Arc::new(store))
    }

    /// Builds the exchange client.
    pub(crate) fn feed(&self) -> Result<Arc<BinanceClient>> {
        let config = match &self.feed_url {
            Some(url) => ClientConfig::default().with_base_url(url),
            None => ClientConfig::default(),
        };
        let client = BinanceClient::new(config).context("Failed to create HTTP client")?;
        Ok(Arc::new(client))
    }

    /// Builds the alert transport. Missing credentials give a silent notifier.
    pub(crate) fn notifier(&self) -> Result<Arc<TelegramNotifier>> {
        let notifier =
            TelegramNotifier::new(self.telegram_token.clone(), self.telegram_chat_id.clone())
                .context("Failed to create Telegram client")?;
        if !notifier.is_configured() {
            tracing::warn!(
                "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set; alerts will be logged only"
            );
        }
        Ok(Arc::new(notifier))
    }
}

/// Builds the detector over `store` with default thresholds.
pub(crate) fn detector(
    store: Arc<SqliteCandleStore>,
    cache: Arc<DedupCache>,
    notifier: Arc<dyn Notifier>,
) -> SignalDetector {
    SignalDetector::new(Resampler::new(store), cache, notifier, DetectorConfig::default())
}

/// Builds a dedup cache with the detector's default cooldown.
pub(crate) fn dedup_cache() -> Arc<DedupCache> {
    Arc::new(DedupCache::new(DetectorConfig::default().cooldown))
}
