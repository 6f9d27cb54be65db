//! Boolean checks applied to indicator series.

/// Counts strictly rising steps across the last `window` values, each compared
/// with its predecessor (so `window + 1` values are read).
///
/// Returns `None` if the series is too short.
#[must_use]
pub fn rising_steps(series: &[f64], window: usize) -> Option<usize> {
    if series.len() < window + 1 {
        return None;
    }
    let tail = &series[series.len() - window - 1..];
    Some(tail.windows(2).filter(|w| w[1] > w[0]).count())
}

/// Trend gate: the trend EMA rose on at least `min_rising` of the last
/// `window` steps and the last close sits above the last EMA value.
#[must_use]
pub fn trend_ok(closes: &[f64], trend: &[f64], window: usize, min_rising: usize) -> bool {
    let (Some(&close), Some(&ema)) = (closes.last(), trend.last()) else {
        return false;
    };
    rising_steps(trend, window).is_some_and(|n| n >= min_rising) && close > ema
}

/// Counts negative values among the last `window` entries.
#[must_use]
pub fn negative_count(series: &[f64], window: usize) -> usize {
    let start = series.len().saturating_sub(window);
    series[start..].iter().filter(|v| **v < 0.0).count()
}

/// Depth gate: fewer than `max_negative` of the last `window` histogram
/// values are negative.
#[must_use]
pub fn depth_ok(histogram: &[f64], window: usize, max_negative: usize) -> bool {
    negative_count(histogram, window) < max_negative
}

/// Bullish crossover above zero at the most recent step.
///
/// True when the current MACD and signal values are both positive, MACD was
/// below the signal one step earlier and is above it now. Only the final step
/// is inspected.
#[must_use]
pub fn is_bullish_cross(macd: &[f64], signal: &[f64]) -> bool {
    let (m, s) = (macd.len(), signal.len());
    if m < 2 || s < 2 {
        return false;
    }
    let (prev_macd, macd_now) = (macd[m - 2], macd[m - 1]);
    let (prev_signal, signal_now) = (signal[s - 2], signal[s - 1]);

    if macd_now <= 0.0 || signal_now <= 0.0 {
        return false;
    }
    prev_macd < prev_signal && macd_now > signal_now
}
