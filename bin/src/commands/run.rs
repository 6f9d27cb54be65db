//! Long-running service: scheduled loops plus the query server.

use crate::context::{Settings, dedup_cache, detector};
use anyhow::{Context, Result};
use candlewatch_lib::prelude::*;
use candlewatch_lib::{LoopStats, SharedSymbols, StoreError};
use chrono::Utc;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

const MS_PER_DAY: i64 = 86_400_000;

/// Options for [`run`].
#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub(crate) bind: SocketAddr,
    pub(crate) sync_every: u64,
    pub(crate) detect_every: u64,
    pub(crate) retention_days: u32,
    pub(crate) concurrency: usize,
}

/// Re-reads the symbol file into `shared`, keeping the current list on failure.
async fn reload_symbols(path: &Path, shared: &SharedSymbols) -> Vec<String> {
    match SymbolList::load(path) {
        Ok(list) => {
            let symbols = list.as_slice().to_vec();
            let mut current = shared.write().await;
            if *current != list {
                tracing::info!(count = list.len(), "symbol list reloaded");
                *current = list;
            }
            symbols
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to reload symbols; keeping previous list");
            shared.read().await.as_slice().to_vec()
        }
    }
}

async fn sweep_retention(store: Arc<SqliteCandleStore>, days: u32) -> Result<(), StoreError> {
    let Some(cutoff) = retention_cutoff(Utc::now().timestamp_millis(), days) else {
        return Ok(());
    };
    let deleted = store.delete_before(cutoff).await?;
    tracing::info!(deleted, retention_days = days, "retention sweep complete");
    Ok(())
}

/// Cutoff for the retention sweep, or `None` when retention is disabled.
const fn retention_cutoff(now_ms: i64, days: u32) -> Option<i64> {
    if days == 0 {
        None
    } else {
        Some(now_ms - days as i64 * MS_PER_DAY)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Starts the sync, detection, retention and cache sweep loops and serves
/// the HTTP API until ctrl-c.
pub(crate) async fn run(settings: &Settings, options: RunOptions) -> Result<()> {
    let symbols: SharedSymbols = Arc::new(RwLock::new(settings.load_symbols()?));
    let store = settings.open_store().await?;
    let feed = settings.feed()?;
    let notifier = settings.notifier()?;
    let cache = dedup_cache();

    let reconciler = Arc::new(Reconciler::new(
        feed,
        store.clone(),
        SyncConfig::default().with_concurrency(options.concurrency),
    ));
    let detector = Arc::new(detector(store.clone(), Arc::clone(&cache), notifier));

    let mut loops: Vec<Arc<LoopStats>> = Vec::new();
    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    let (stats, handle) = {
        let reconciler = Arc::clone(&reconciler);
        let symbols = Arc::clone(&symbols);
        let path = settings.symbols.clone();
        spawn_loop(
            Schedule::new("sync", Duration::from_secs(options.sync_every)),
            move || {
                let reconciler = Arc::clone(&reconciler);
                let symbols = Arc::clone(&symbols);
                let path = path.clone();
                async move {
                    let list = reload_symbols(&path, &symbols).await;
                    let report = reconciler.reconcile(&list).await;
                    if report.succeeded() == 0 && report.failed() > 0 {
                        return Err(format!("all {} symbols failed to sync", report.failed()));
                    }
                    Ok(())
                }
            },
        )
    };
    loops.push(stats);
    handles.push(handle);

    let (stats, handle) = {
        let detector = Arc::clone(&detector);
        let symbols = Arc::clone(&symbols);
        let path = settings.symbols.clone();
        spawn_loop(
            Schedule::new("detect", Duration::from_secs(options.detect_every)).delayed(),
            move || {
                let detector = Arc::clone(&detector);
                let symbols = Arc::clone(&symbols);
                let path = path.clone();
                async move {
                    let list = reload_symbols(&path, &symbols).await;
                    let report = detector.detect_all(&list).await;
                    if report.evaluated == 0 && report.errors > 0 {
                        return Err(format!("all {} evaluations failed", report.errors));
                    }
                    Ok(())
                }
            },
        )
    };
    loops.push(stats);
    handles.push(handle);

    if options.retention_days > 0 {
        let days = options.retention_days;
        let store = store.clone();
        let (stats, handle) = spawn_loop(
            Schedule::new("retention", Duration::from_secs(24 * 60 * 60)),
            move || sweep_retention(store.clone(), days),
        );
        loops.push(stats);
        handles.push(handle);
    } else {
        tracing::info!("retention disabled");
    }

    handles.push(cache.spawn_sweeper(Duration::from_secs(60 * 60)));
    tracing::debug!(cooldown_secs = cache.ttl().num_seconds(), "dedup sweeper started");

    let state = AppState::new(store.clone(), Arc::clone(&symbols)).with_loops(loops);
    let listener = TcpListener::bind(options.bind)
        .await
        .with_context(|| format!("Failed to bind {}", options.bind))?;

    serve(listener, router(state), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    for handle in &handles {
        handle.abort();
    }
    store.close().await;
    tracing::info!("stopped");
    Ok(())
}
