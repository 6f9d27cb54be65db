//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use candlewatch_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request is missing or has an invalid parameter.
    #[error("bad_request: {0}")]
    BadRequest(String),

    /// The candle store failed.
    #[error("store_error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Store(e) => {
                tracing::error!(error = %e, "store failure while serving request");
                "internal store error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
