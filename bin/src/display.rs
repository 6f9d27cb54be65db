//! Terminal output for the one-shot commands.

use candlewatch_lib::prelude::*;
use candlewatch_lib::{
    DetectionReport, Evaluation, ReconcileReport, SignalError, SyncAction, SymbolReport,
};
use chrono::DateTime;

/// Formats an epoch-millisecond timestamp as UTC, or the raw number if out of range.
pub(crate) fn format_millis(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map_or_else(|| ms.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

fn describe(report: &SymbolReport) -> (String, String) {
    match &report.result {
        Ok(sync) => {
            let action = match sync.action {
                SyncAction::ColdStart { from } => format!("backfill from {}", format_millis(from)),
                SyncAction::Incremental { from } => format!("update from {}", format_millis(from)),
                SyncAction::Fresh => "up to date".to_string(),
            };
            (action, sync.fetched.to_string())
        }
        Err(e) => (format!("failed: {e}"), "-".to_string()),
    }
}

/// Prints a per-symbol sync table followed by totals.
pub(crate) fn print_sync_report(report: &ReconcileReport) {
    println!("{:<14} {:>8}  {}", "SYMBOL", "FETCHED", "ACTION");
    println!("{}", "-".repeat(60));

    for symbol in &report.symbols {
        let (action, fetched) = describe(symbol);
        println!("{:<14} {:>8}  {}", symbol.symbol, fetched, action);
    }

    println!(
        "\nTotal: {} candles, {} ok, {} failed",
        report.fetched(),
        report.succeeded(),
        report.failed()
    );
}

/// Prints gate values for every evaluated symbol.
pub(crate) fn print_evaluations(rows: &[(String, Result<Evaluation, SignalError>)]) {
    println!(
        "{:<14} {:>12} {:>12} {:>6} {:>12} {:>12} {:>5} {:>6}",
        "SYMBOL", "CLOSE", "EMA", "TREND", "MACD", "SIGNAL", "NEG", "CROSS"
    );
    println!("{}", "-".repeat(86));

    for (symbol, result) in rows {
        match result {
            Ok(eval) => println!(
                "{:<14} {:>12.4} {:>12.4} {:>6} {:>12.6} {:>12.6} {:>5} {:>6}",
                symbol,
                eval.last_close,
                eval.last_ema,
                if eval.trend_ok { "yes" } else { "no" },
                eval.macd,
                eval.signal,
                eval.negative_histograms,
                if eval.fires() { "FIRE" } else { "-" },
            ),
            Err(e) => println!("{symbol:<14} {e}"),
        }
    }
}

/// Prints the outcome of a detection pass.
pub(crate) fn print_detection(report: &DetectionReport) {
    println!(
        "Evaluated {} symbols ({} without enough history, {} errors)",
        report.evaluated, report.insufficient, report.errors
    );
    if !report.suppressed.is_empty() {
        println!("Cooling down: {}", report.suppressed.join(", "));
    }
    match &report.message {
        Some(message) => {
            let status = if report.notified { "sent" } else { "not delivered" };
            println!("\nAlert ({status}):\n{message}");
        }
        None => println!("No new crossovers."),
    }
}

/// Prints configured symbols alongside what the store holds for them.
pub(crate) fn print_symbols(configured: &SymbolList, stored: &[(String, u64, Option<i64>)]) {
    println!("{:<14} {:>10} {:>10}  {}", "SYMBOL", "CONFIGURED", "CANDLES", "LATEST");
    println!("{}", "-".repeat(56));

    for (symbol, count, latest) in stored {
        println!(
            "{:<14} {:>10} {:>10}  {}",
            symbol,
            if configured.contains(symbol) { "yes" } else { "no" },
            count,
            latest.map_or_else(|| "-".to_string(), format_millis)
        );
    }
    println!("\nTotal: {} configured, {} stored", configured.len(), stored.len());
}
