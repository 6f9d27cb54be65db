//! Symbol overview.

use crate::context::Settings;
use crate::display::print_symbols;
use anyhow::Result;
use candlewatch_lib::prelude::*;
use std::collections::BTreeSet;

/// Lists configured symbols and stored series with their candle counts.
pub(crate) async fn list_symbols(settings: &Settings) -> Result<()> {
    let configured = settings.load_symbols()?;
    let store = settings.open_store().await?;

    let mut names: BTreeSet<String> = store.symbols().await?.into_iter().collect();
    names.extend(configured.iter().cloned());

    let mut rows = Vec::with_capacity(names.len());
    for symbol in names {
        let count = store.count(&symbol).await?;
        let latest = store.latest_open_time(&symbol).await?;
        rows.push((symbol, count, latest));
    }

    print_symbols(&configured, &rows);
    store.close().await;
    Ok(())
}
