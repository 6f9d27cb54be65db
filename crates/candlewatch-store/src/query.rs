//! Range read parameters.

use candlewatch_types::Candle;

/// Sort direction by open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

impl Order {
    pub(crate) const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// A bounded read over one symbol's series.
///
/// Both bounds are inclusive on `open_time`. The default reads every candle,
/// oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeQuery {
    /// Lower bound on open time (ms).
    pub from: Option<i64>,
    /// Upper bound on open time (ms).
    pub to: Option<i64>,
    /// Maximum number of candles returned.
    pub limit: Option<u32>,
    /// Result ordering.
    pub order: Order,
}

impl RangeQuery {
    /// The most recent `limit` candles, newest first.
    #[must_use]
    pub const fn latest(limit: u32) -> Self {
        Self {
            from: None,
            to: None,
            limit: Some(limit),
            order: Order::Descending,
        }
    }

    /// Returns true if `open_time` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, open_time: i64) -> bool {
        let above = match self.from {
            Some(from) => open_time >= from,
            None => true,
        };
        let below = match self.to {
            Some(to) => open_time <= to,
            None => true,
        };
        above && below
    }

    /// Applies bounds, ordering and limit to an ascending sequence.
    pub(crate) fn apply<'a>(
        &self,
        ascending: impl DoubleEndedIterator<Item = &'a Candle>,
    ) -> Vec<Candle> {
        let limit = self.limit.map_or(usize::MAX, |l| l as usize);
        let filtered = ascending.filter(|c| self.contains(c.open_time));
        match self.order {
            Order::Ascending => filtered.take(limit).copied().collect(),
            Order::Descending => filtered.rev().take(limit).copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open_time: i64) -> Candle {
        Candle::new(open_time, open_time + 299_999, 1.0, 1.0, 1.0, 1.0, 0.0)
    }

    #[test]
    fn test_contains_bounds_inclusive() {
        let q = RangeQuery {
            from: Some(100),
            to: Some(200),
            ..RangeQuery::default()
        };
        assert!(q.contains(100));
        assert!(q.contains(200));
        assert!(!q.contains(99));
        assert!(!q.contains(201));
        assert!(RangeQuery::default().contains(i64::MIN));
    }

    #[test]
    fn test_apply_latest() {
        let candles: Vec<Candle> = (0..5).map(|i| candle(i * 300_000)).collect();
        let out = RangeQuery::latest(2).apply(candles.iter());
        let times: Vec<i64> = out.iter().map(|c| c.open_time).collect();
        assert_eq!(times, vec![1_200_000, 900_000]);
    }

    #[test]
    fn test_apply_bounded_ascending() {
        let candles: Vec<Candle> = (0..5).map(|i| candle(i * 300_000)).collect();
        let query = RangeQuery {
            from: Some(300_000),
            to: Some(900_000),
            ..RangeQuery::default()
        };
        let out = query.apply(candles.iter());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].open_time, 300_000);
    }
}
