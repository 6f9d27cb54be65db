//! Router and request handlers.

use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kline::{KlinesQuery, kline_row};
use crate::{ApiError, AppState};

/// Builds the application router with tracing, compression and CORS layers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/klines", get(klines))
        .route("/symbols", get(symbols))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Serves `router` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "http server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn klines(
    State(state): State<AppState>,
    Query(query): Query<KlinesQuery>,
) -> Result<([(header::HeaderName, HeaderValue); 1], Json<Value>), ApiError> {
    let symbol = query.symbol()?;
    let interval = query.interval();
    let limit = query.limit();

    let buckets = state.resampler.resample(&symbol, interval, limit).await?;
    tracing::debug!(%symbol, %interval, limit, returned = buckets.len(), "served klines");

    let rows: Vec<Value> = buckets.iter().map(kline_row).collect();
    Ok((
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(Value::Array(rows)),
    ))
}

async fn symbols(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.symbols.read().await.as_slice().to_vec())
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let loops: Vec<_> = state.loops.iter().map(|l| l.snapshot()).collect();
    Json(json!({ "status": "ok", "loops": loops }))
}
