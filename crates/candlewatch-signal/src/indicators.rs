//! Moving-average indicators over close-price series.
//!
//! Series are index-aligned with their input. Positions before an indicator
//! has enough data hold `0.0` and must not be read as values.

/// Exponential moving average seeded with the simple average of the first
/// `period` observations.
///
/// ```text
/// bar period-1 → SMA(first period prices)
/// bar period+  → α·price + (1−α)·prev   where α = 2/(period+1)
/// ```
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    period: usize,
    count: usize,
    sum: f64,
    value: f64,
}

impl Ema {
    /// Creates an EMA over `period` observations. A zero period is treated
    /// as one.
    #[must_use]
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            alpha: 2.0 / (period as f64 + 1.0),
            period,
            count: 0,
            sum: 0.0,
            value: 0.0,
        }
    }

    /// Feeds one observation, returning the EMA once warm.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        self.count += 1;
        if self.count < self.period {
            self.sum += price;
            return None;
        }
        if self.count == self.period {
            self.value = (self.sum + price) / self.period as f64;
        } else {
            self.value = price * self.alpha + self.value * (1.0 - self.alpha);
        }
        Some(self.value)
    }
}

/// Computes the EMA of `values`.
///
/// The result has the same length as the input; indices before
/// `period - 1` are `0.0`. Input shorter than `period` yields all zeros.
#[must_use]
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    if values.len() < period.max(1) {
        return out;
    }
    let mut ema = Ema::new(period);
    for (slot, &value) in out.iter_mut().zip(values) {
        if let Some(v) = ema.update(value) {
            *slot = v;
        }
    }
    out
}

/// MACD line, signal line and histogram, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    /// Fast EMA minus slow EMA; valid from index `slow - 1`.
    pub macd: Vec<f64>,
    /// EMA of the valid MACD segment; valid from index `slow + signal - 2`.
    pub signal: Vec<f64>,
    /// MACD minus signal where the signal is valid.
    pub histogram: Vec<f64>,
    /// First index where `signal` and `histogram` hold values.
    pub first_valid: usize,
}

impl MacdSeries {
    /// Returns true if at least `n` signal values are available.
    #[must_use]
    pub fn has_signal(&self, n: usize) -> bool {
        self.signal.len() >= self.first_valid + n
    }
}

/// Computes MACD with the given fast, slow and signal periods.
///
/// The signal EMA runs over the MACD segment starting at `slow - 1`, so the
/// zero prefix never enters the smoothing.
#[must_use]
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let len = closes.len();
    let slow_start = slow.max(1) - 1;
    let first_valid = slow_start + signal.max(1) - 1;

    let mut macd_line = vec![0.0; len];
    let mut signal_line = vec![0.0; len];
    let mut histogram = vec![0.0; len];

    if len > slow_start {
        let fast_ema = ema(closes, fast);
        let slow_ema = ema(closes, slow);
        for i in slow_start..len {
            macd_line[i] = fast_ema[i] - slow_ema[i];
        }

        let smoothed = ema(&macd_line[slow_start..], signal);
        for i in first_valid..len {
            signal_line[i] = smoothed[i - slow_start];
            histogram[i] = macd_line[i] - signal_line[i];
        }
    }

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
        first_valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ema_reference_values() {
        let closes: Vec<f64> = (1..=10u8).map(f64::from).collect();
        let out = ema(&closes, 3);

        // Seed = (1+2+3)/3 = 2, then α = 0.5 on a linear series keeps lag 1.
        let expected = [0.0, 0.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(out.len(), expected.len());
        for (got, want) in out.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ema_non_linear() {
        let out = ema(&[10.0, 11.0, 12.0, 20.0], 3);
        assert_relative_eq!(out[2], 11.0);
        assert_relative_eq!(out[3], 15.5);
    }

    #[test]
    fn test_ema_short_input_is_zero() {
        assert_eq!(ema(&[1.0, 2.0], 3), vec![0.0, 0.0]);
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn test_incremental_matches_batch() {
        let closes = [5.0, 7.0, 6.0, 9.0, 11.0, 10.0];
        let batch = ema(&closes, 4);
        let mut inc = Ema::new(4);
        for (i, &c) in closes.iter().enumerate() {
            let v = inc.update(c);
            assert_eq!(v.is_some(), i >= 3);
            if let Some(v) = v {
                assert_relative_eq!(v, batch[i]);
            }
        }
    }

    #[test]
    fn test_macd_alignment() {
        let closes: Vec<f64> = (0..60u8).map(|i| 100.0 + f64::from(i).sin() * 5.0).collect();
        let series = macd(&closes, 12, 26, 9);

        assert_eq!(series.first_valid, 33);
        assert!(series.macd[..25].iter().all(|v| *v == 0.0));
        assert!(series.signal[..33].iter().all(|v| *v == 0.0));
        assert!(series.has_signal(2));

        // Signal seed is the mean of the first nine valid MACD values.
        let seed: f64 = series.macd[25..34].iter().sum::<f64>() / 9.0;
        assert_relative_eq!(series.signal[33], seed, epsilon = 1e-12);
        assert_relative_eq!(series.histogram[40], series.macd[40] - series.signal[40]);
    }

    #[test]
    fn test_macd_constant_series_is_flat() {
        let series = macd(&[50.0; 40], 12, 26, 9);
        assert!(series.macd.iter().all(|v| v.abs() < 1e-12));
        assert!(series.histogram.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_macd_short_input() {
        let series = macd(&[1.0; 20], 12, 26, 9);
        assert!(!series.has_signal(1));
        assert!(series.macd.iter().all(|v| *v == 0.0));
    }
}
