//! Montagem do router.

use std::time::Duration;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use super::protocol::ApiResponse;

/// Cria o router com todas as rotas, tracing de requisições e timeout.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/calculate", post(handlers::calculate))
        .route(
            "/history",
            get(handlers::history).delete(handlers::clear_history),
        )
        .route(
            "/history/{id}",
            get(handlers::show).delete(handlers::destroy),
        )
        .fallback(handlers::not_found)
        .with_state(state);

    with_layers(routes, request_timeout)
}

/// Timeout (convertido no envelope) e tracing, nesta ordem de dentro para fora.
fn with_layers(routes: Router, request_timeout: Duration) -> Router {
    routes
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(timeout_envelope))
        .layer(TraceLayer::new_for_http())
}

/// O `TimeoutLayer` responde 408 sem corpo; os handlers nunca produzem 408.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!("Request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ApiResponse::<()>::error("Request timed out")),
    )
        .into_response()
}
