use std::{sync::Arc, time::Duration};

use axum::{error_handling::HandleErrorLayer, http::HeaderValue, BoxError, Router};
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiError, main_lib::AppState};

mod health;
mod quotes;
mod watchlist;

/// Errors from the middleware stack, rendered in the response envelope.
fn middleware_error(err: BoxError, timeout: Duration) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded the {:?} timeout", timeout);
        ApiError::timed_out(timeout)
    } else {
        ApiError::Internal(err.to_string())
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    let api = Router::new()
        .merge(health::router())
        .merge(quotes::router())
        .merge(watchlist::router())
        .with_state(state);

    let timeout = config.request_timeout;
    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(err, timeout)
                }))
                .timeout(timeout),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
