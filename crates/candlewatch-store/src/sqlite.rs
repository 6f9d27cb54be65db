//! SQLite-backed candle store.

use async_trait::async_trait;
use candlewatch_types::Candle;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, QueryBuilder, Row, Sqlite};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{CandleStore, RangeQuery, StoreError};

/// Rows per multi-row insert. Eight binds per row keeps each statement far
/// below SQLite's parameter limit.
const INSERT_CHUNK: usize = 1000;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS candles (
    symbol     TEXT    NOT NULL,
    open_time  INTEGER NOT NULL,
    close_time INTEGER NOT NULL,
    open       REAL    NOT NULL,
    high       REAL    NOT NULL,
    low        REAL    NOT NULL,
    close      REAL    NOT NULL,
    volume     REAL    NOT NULL,
    PRIMARY KEY (symbol, open_time)
)";

const UPSERT_CONFLICT: &str = " ON CONFLICT(symbol, open_time) DO UPDATE SET \
    close_time = excluded.close_time, \
    open = excluded.open, \
    high = excluded.high, \
    low = excluded.low, \
    close = excluded.close, \
    volume = excluded.volume";

/// Connection settings for [`SqliteCandleStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file path. Created if missing.
    pub path: PathBuf,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// How long a writer waits on a locked database.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration for the database at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("klines.db"),
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Candle store persisted in a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteCandleStore {
    pool: Pool<Sqlite>,
    path: PathBuf,
}

impl SqliteCandleStore {
    /// Opens (or creates) the database and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be opened or the schema
    /// cannot be created.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let open_err = |source| StoreError::Open {
            path: config.path.clone(),
            source,
        };

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(open_err)?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(open_err)?;

        tracing::debug!(path = %config.path.display(), "opened candle store");

        Ok(Self {
            pool,
            path: config.path.clone(),
        })
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn from_row(row: &SqliteRow) -> Result<Candle, sqlx::Error> {
        Ok(Candle::new(
            row.try_get("open_time")?,
            row.try_get("close_time")?,
            row.try_get("open")?,
            row.try_get("high")?,
            row.try_get("low")?,
            row.try_get("close")?,
            row.try_get("volume")?,
        ))
    }
}

#[async_trait]
impl CandleStore for SqliteCandleStore {
    async fn upsert(&self, symbol: &str, candle: &Candle) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO candles (symbol, open_time, close_time, open, high, low, close, volume) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?){UPSERT_CONFLICT}"
        );
        sqlx::query(&sql)
            .bind(symbol)
            .bind(candle.open_time)
            .bind(candle.close_time)
            .bind(candle.open)
            .bind(candle.high)
            .bind(candle.low)
            .bind(candle.close)
            .bind(candle.volume)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_batch(&self, symbol: &str, candles: &[Candle]) -> Result<u64, StoreError> {
        if candles.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for chunk in candles.chunks(INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO candles (symbol, open_time, close_time, open, high, low, close, volume) ",
            );
            builder.push_values(chunk, |mut b, c| {
                b.push_bind(symbol.to_string())
                    .push_bind(c.open_time)
                    .push_bind(c.close_time)
                    .push_bind(c.open)
                    .push_bind(c.high)
                    .push_bind(c.low)
                    .push_bind(c.close)
                    .push_bind(c.volume);
            });
            builder.push(UPSERT_CONFLICT);
            builder.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;

        Ok(candles.len() as u64)
    }

    async fn latest_open_time(&self, symbol: &str) -> Result<Option<i64>, StoreError> {
        let latest: Option<i64> =
            sqlx::query_scalar("SELECT MAX(open_time) FROM candles WHERE symbol = ?")
                .bind(symbol)
                .fetch_one(&self.pool)
                .await?;
        Ok(latest)
    }

    async fn range(&self, symbol: &str, query: &RangeQuery) -> Result<Vec<Candle>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT open_time, close_time, open, high, low, close, volume FROM candles WHERE symbol = ",
        );
        builder.push_bind(symbol.to_string());
        if let Some(from) = query.from {
            builder.push(" AND open_time >= ").push_bind(from);
        }
        if let Some(to) = query.to {
            builder.push(" AND open_time <= ").push_bind(to);
        }
        builder.push(" ORDER BY open_time ").push(query.order.as_sql());
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        let candles = rows
            .iter()
            .map(Self::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(candles)
    }

    async fn count(&self, symbol: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candles WHERE symbol = ?")
            .bind(symbol)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn symbols(&self) -> Result<Vec<String>, StoreError> {
        let symbols: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT symbol FROM candles ORDER BY symbol")
                .fetch_all(&self.pool)
                .await?;
        Ok(symbols)
    }

    async fn delete_before(&self, cutoff: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM candles WHERE open_time < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Order;
    use tempfile::TempDir;

    const FIVE_MIN: i64 = 300_000;
    const T0: i64 = 1_700_000_100_000;

    fn candle(i: i64, close: f64) -> Candle {
        let open_time = T0 + i * FIVE_MIN;
        Candle::new(
            open_time,
            open_time + FIVE_MIN - 1,
            close,
            close + 1.0,
            close - 1.0,
            close,
            10.0,
        )
    }

    async fn open_temp() -> (TempDir, SqliteCandleStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteCandleStore::open(&StoreConfig::new(dir.path().join("klines.db")))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_empty_store() {
        let (_dir, store) = open_temp().await;
        assert_eq!(store.latest_open_time("BTCUSDT").await.unwrap(), None);
        assert_eq!(store.count("BTCUSDT").await.unwrap(), 0);
        assert!(store.symbols().await.unwrap().is_empty());
        assert!(store.range("BTCUSDT", &RangeQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_open_time() {
        let (_dir, store) = open_temp().await;
        store.upsert("BTCUSDT", &candle(0, 100.0)).await.unwrap();
        store.upsert("BTCUSDT", &candle(0, 105.0)).await.unwrap();

        let rows = store.range("BTCUSDT", &RangeQuery::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].close - 105.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_upsert_batch_idempotent() {
        let (_dir, store) = open_temp().await;
        let batch: Vec<Candle> = (0..50).map(|i| candle(i, 100.0 + i as f64)).collect();

        assert_eq!(store.upsert_batch("ETHUSDT", &batch).await.unwrap(), 50);
        let first = store.range("ETHUSDT", &RangeQuery::default()).await.unwrap();
        store.upsert_batch("ETHUSDT", &batch).await.unwrap();
        let second = store.range("ETHUSDT", &RangeQuery::default()).await.unwrap();

        assert_eq!(store.count("ETHUSDT").await.unwrap(), 50);
        assert_eq!(first, second);
        assert_eq!(
            store.latest_open_time("ETHUSDT").await.unwrap(),
            Some(T0 + 49 * FIVE_MIN)
        );
    }

    #[tokio::test]
    async fn test_range_ordering_and_bounds() {
        let (_dir, store) = open_temp().await;
        let batch: Vec<Candle> = (0..10).map(|i| candle(i, 100.0)).collect();
        store.upsert_batch("BTCUSDT", &batch).await.unwrap();

        let latest = store.range("BTCUSDT", &RangeQuery::latest(3)).await.unwrap();
        let times: Vec<i64> = latest.iter().map(|c| c.open_time).collect();
        assert_eq!(times, vec![T0 + 9 * FIVE_MIN, T0 + 8 * FIVE_MIN, T0 + 7 * FIVE_MIN]);

        let query = RangeQuery {
            from: Some(T0 + 2 * FIVE_MIN),
            to: Some(T0 + 4 * FIVE_MIN),
            limit: None,
            order: Order::Ascending,
        };
        let bounded = store.range("BTCUSDT", &query).await.unwrap();
        assert_eq!(bounded.len(), 3);
        assert_eq!(bounded[0].open_time, T0 + 2 * FIVE_MIN);
    }

    #[tokio::test]
    async fn test_symbols_are_partitioned() {
        let (_dir, store) = open_temp().await;
        store.upsert_batch("SOLUSDT", &[candle(0, 20.0)]).await.unwrap();
        store.upsert_batch("BTCUSDT", &[candle(0, 100.0), candle(1, 101.0)]).await.unwrap();

        assert_eq!(store.symbols().await.unwrap(), vec!["BTCUSDT", "SOLUSDT"]);
        assert_eq!(store.count("SOLUSDT").await.unwrap(), 1);
        assert_eq!(store.count("BTCUSDT").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_before() {
        let (_dir, store) = open_temp().await;
        let batch: Vec<Candle> = (0..10).map(|i| candle(i, 100.0)).collect();
        store.upsert_batch("BTCUSDT", &batch).await.unwrap();

        let deleted = store.delete_before(T0 + 4 * FIVE_MIN).await.unwrap();
        assert_eq!(deleted, 4);
        assert_eq!(store.count("BTCUSDT").await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_reopen_persists() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("klines.db"));

        let store = SqliteCandleStore::open(&config).await.unwrap();
        store.upsert("BTCUSDT", &candle(0, 100.0)).await.unwrap();
        store.close().await;

        let reopened = SqliteCandleStore::open(&config).await.unwrap();
        assert_eq!(reopened.count("BTCUSDT").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_invalid_path() {
        let config = StoreConfig::new("/nonexistent-dir/sub/klines.db");
        let result = SqliteCandleStore::open(&config).await;
        assert!(matches!(result, Err(StoreError::Open { .. })));
    }
}
