//! One-shot crossover detection.

use crate::context::{Settings, dedup_cache, detector};
use crate::display::{print_detection, print_evaluations};
use anyhow::Result;
use chrono::Utc;

/// Evaluates every configured symbol once.
///
/// With `dry_run` nothing is claimed or sent. With `explain` the gate values
/// for each symbol are printed.
pub(crate) async fn detect_once(settings: &Settings, dry_run: bool, explain: bool) -> Result<()> {
    let symbols = settings.load_symbols()?;
    let store = settings.open_store().await?;
    let notifier = settings.notifier()?;
    let detector = detector(store.clone(), dedup_cache(), notifier);

    if dry_run || explain {
        let rows = detector.scan_at(symbols.as_slice(), Utc::now()).await;
        print_evaluations(&rows);
    }

    if !dry_run {
        let report = detector.detect_all(symbols.as_slice()).await;
        if explain {
            println!();
        }
        print_detection(&report);
    }

    store.close().await;
    Ok(())
}
