use std::time::Duration;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stockdash_market_data::{ApiError as QuoteError, ErrorKind, TickerError};
use thiserror::Error;

use crate::models::ApiResponse;

/// Longest `Retry-After` we are willing to advertise, in seconds.
const MAX_RETRY_AFTER_SECS: u64 = 300;

#[derive(Error, Debug)]
pub enum ApiError {
    /// A classified failure from validation or the quote pipeline.
    #[error("{0}")]
    Quote(#[from] QuoteError),

    /// Per-client request limit reached.
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited { retry_after: Option<Duration> },

    /// Anything outside the error taxonomy. The cause is logged, never returned.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_symbol(message: impl Into<String>) -> Self {
        ApiError::Quote(QuoteError::invalid_symbol(message))
    }

    /// The whole request outlived the server's request timeout.
    pub fn timed_out(after: Duration) -> Self {
        ApiError::Quote(QuoteError::new(
            ErrorKind::NetworkError,
            format!("Request timed out after {}s", after.as_secs()),
        ))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {}", rejection.body_text());
        ApiError::invalid_symbol("Invalid ticker symbol")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query: {}", rejection.body_text());
        ApiError::invalid_symbol("Invalid query string")
    }
}

impl From<TickerError> for ApiError {
    fn from(err: TickerError) -> Self {
        ApiError::Quote(err.into())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidSymbol => StatusCode::BAD_REQUEST,
        ErrorKind::ApiLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::InvalidApiKey => StatusCode::UNAUTHORIZED,
        ErrorKind::NetworkError => StatusCode::BAD_GATEWAY,
        ErrorKind::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Whole seconds to advertise, or `None` when outside 1..=300.
fn retry_after_secs(retry_after: Option<Duration>) -> Option<u64> {
    let secs = retry_after?.as_millis().div_ceil(1000);
    let secs = u64::try_from(secs).ok()?;
    (1..=MAX_RETRY_AFTER_SECS).contains(&secs).then_some(secs)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Quote(error) => {
                let status = status_for(error.code);
                (status, Json(ApiResponse::<()>::failure(error))).into_response()
            }
            ApiError::RateLimited { retry_after } => {
                let secs = retry_after_secs(retry_after);
                let mut error = QuoteError::new(
                    ErrorKind::ApiLimitExceeded,
                    "Rate limit exceeded. Try again later.",
                );
                if let Some(secs) = secs {
                    error = error.with_details(json!({ "retryAfter": secs }));
                }

                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ApiResponse::<()>::failure(error)),
                )
                    .into_response();
                if let Some(secs) = secs {
                    response
                        .headers_mut()
                        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                }
                response
            }
            ApiError::Internal(cause) => {
                tracing::error!("Unhandled error: {}", cause);
                let error = QuoteError::unknown("An unexpected error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::failure(error)),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
