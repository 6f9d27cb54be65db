//! Kline endpoint URL construction.

use crate::KlineRequest;

/// Base URL of the Binance USD-M futures REST API.
pub const BASE_URL: &str = "https://fapi.binance.com";

/// Path of the kline endpoint.
pub const KLINES_PATH: &str = "/fapi/v1/klines";

/// Builds the kline URL for `request` against `base_url`.
///
/// Time bounds are only appended when set.
///
/// # Example
///
/// ```
/// use candlewatch_fetch::{KlineRequest, url::klines_url};
/// use candlewatch_types::Interval;
///
/// let req = KlineRequest::new("BTCUSDT", Interval::Minute5, 99).starting_at(1_700_000_100_000);
/// assert_eq!(
///     klines_url("https://fapi.binance.com", &req),
///     "https://fapi.binance.com/fapi/v1/klines?symbol=BTCUSDT&interval=5m&limit=99&startTime=1700000100000"
/// );
/// ```
#[must_use]
pub fn klines_url(base_url: &str, request: &KlineRequest) -> String {
    let mut url = format!(
        "{}{}?symbol={}&interval={}&limit={}",
        base_url.trim_end_matches('/'),
        KLINES_PATH,
        request.symbol.to_uppercase(),
        request.interval.as_str(),
        request.limit
    );
    if let Some(start) = request.start_time {
        url.push_str(&format!("&startTime={start}"));
    }
    if let Some(end) = request.end_time {
        url.push_str(&format!("&endTime={end}"));
    }
    url
}
