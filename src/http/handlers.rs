//! Handlers dos endpoints HTTP.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::cache::CalculationCache;
use crate::calc::Operator;
use crate::{AbacusError, AbacusResult};

use super::protocol::{
    ApiResponse, CalculateRequest, CalculationView, ClearedView, DeletedView, HealthResponse,
    HistoryQuery, HistoryView, OperationView,
};

/// Estado compartilhado pelos handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CalculationCache>,
    pub service_name: String,
}

impl AppState {
    pub fn new(cache: Arc<CalculationCache>, service_name: impl Into<String>) -> Self {
        Self {
            cache,
            service_name: service_name.into(),
        }
    }
}

type ApiResult<T> = AbacusResult<(StatusCode, Json<ApiResponse<T>>)>;

fn invalid(rejection: impl std::fmt::Display) -> AbacusError {
    AbacusError::validation(rejection.to_string())
}

/// POST /calculate
///
/// 201 quando a operação foi calculada agora, 200 quando veio do cache.
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<CalculationView> {
    let Json(request) = payload.map_err(|r| invalid(r.body_text()))?;
    let operator: Operator = request.operator.parse()?;

    let calculation = state
        .cache
        .calculate(request.num1, operator, request.num2)
        .await?;

    let status = if calculation.cached {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(ApiResponse::ok(calculation.into()))))
}

/// GET /history?limit=N
pub async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<HistoryView> {
    let Query(query) = query.map_err(|r| invalid(r.body_text()))?;
    let records = state.cache.history(query.limit).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(records.into()))))
}

/// GET /history/{id}
pub async fn show(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<OperationView> {
    let Path(id) = id.map_err(|r| invalid(r.body_text()))?;
    let record = state.cache.get(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(record.into()))))
}

/// DELETE /history/{id}
pub async fn destroy(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DeletedView> {
    let Path(id) = id.map_err(|r| invalid(r.body_text()))?;
    state.cache.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok_with_message(
            "Operation deleted",
            DeletedView { deleted_id: id },
        )),
    ))
}

/// DELETE /history
pub async fn clear_history(State(state): State<AppState>) -> ApiResult<ClearedView> {
    let deleted = state.cache.clear().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok_with_message(
            "History cleared",
            ClearedView { deleted },
        )),
    ))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.service_name.clone()))
}

/// Rotas desconhecidas.
pub async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Route not found")),
    )
}
