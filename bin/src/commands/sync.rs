//! One-shot reconciliation.

use crate::context::Settings;
use crate::display::print_sync_report;
use anyhow::Result;
use candlewatch_lib::prelude::*;

/// Runs one sync pass over the configured symbols and prints the outcome.
pub(crate) async fn sync_once(settings: &Settings, concurrency: usize) -> Result<()> {
    let symbols = settings.load_symbols()?;
    let store = settings.open_store().await?;
    let feed = settings.feed()?;

    let reconciler = Reconciler::new(
        feed,
        store.clone(),
        SyncConfig::default().with_concurrency(concurrency),
    );
    let report = reconciler.reconcile(symbols.as_slice()).await;
    print_sync_report(&report);

    store.close().await;
    Ok(())
}
