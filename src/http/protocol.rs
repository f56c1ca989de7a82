//! Tipos do protocolo HTTP: envelope de resposta e DTOs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::Calculation;
use crate::calc::{Cents, Operator};
use crate::store::OperationRecord;
use crate::AbacusError;

// ═══════════════════════════════════════════════════════════════════════════
// Envelope
// ═══════════════════════════════════════════════════════════════════════════

/// Envelope uniforme de resposta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Resposta de sucesso com dados.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Resposta de sucesso com mensagem e dados.
    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Resposta de erro.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl IntoResponse for AbacusError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_client_error() {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        } else {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Requisições
// ═══════════════════════════════════════════════════════════════════════════

/// Corpo de `POST /calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub num1: f64,
    pub operator: String,
    pub num2: f64,
}

/// Query de `GET /history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Respostas
// ═══════════════════════════════════════════════════════════════════════════

/// Visão pública de um registro.
#[derive(Debug, Clone, Serialize)]
pub struct OperationView {
    pub id: i64,
    pub num1: Cents,
    pub operator: Operator,
    pub num2: Cents,
    pub result: Cents,
    pub expression: String,
    pub created_at: DateTime<Utc>,
}

impl From<OperationRecord> for OperationView {
    fn from(record: OperationRecord) -> Self {
        Self {
            expression: record.expression(),
            id: record.id,
            num1: record.operand1,
            operator: record.operator,
            num2: record.operand2,
            result: record.result,
            created_at: record.created_at,
        }
    }
}

/// Dados de `POST /calculate`.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationView {
    #[serde(flatten)]
    pub operation: OperationView,
    pub cached: bool,
}

impl From<Calculation> for CalculationView {
    fn from(calculation: Calculation) -> Self {
        Self {
            operation: calculation.record.into(),
            cached: calculation.cached,
        }
    }
}

/// Dados de `GET /history`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub count: usize,
    pub operations: Vec<OperationView>,
}

impl From<Vec<OperationRecord>> for HistoryView {
    fn from(records: Vec<OperationRecord>) -> Self {
        Self {
            count: records.len(),
            operations: records.into_iter().map(OperationView::from).collect(),
        }
    }
}

/// Dados de `DELETE /history/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedView {
    pub deleted_id: i64,
}

/// Dados de `DELETE /history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearedView {
    pub deleted: usize,
}

/// Corpo de `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn ok(service: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record() -> OperationRecord {
        OperationRecord {
            id: 3,
            operand1: Cents::from_hundredths(200),
            operator: Operator::Add,
            operand2: Cents::from_hundredths(300),
            result: Cents::from_hundredths(500),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_error_envelope() {
        let value = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "nope", "data": null}));
    }

    #[test]
    fn test_calculation_view_is_flat() {
        let view = CalculationView::from(Calculation {
            record: record(),
            cached: true,
        });
        let value: Value = serde_json::to_value(ApiResponse::ok(view)).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["message"], Value::Null);
        assert_eq!(value["data"]["id"], 3);
        assert_eq!(value["data"]["num1"], 2.0);
        assert_eq!(value["data"]["operator"], "+");
        assert_eq!(value["data"]["result"], 5.0);
        assert_eq!(value["data"]["expression"], "2.00 + 3.00 = 5.00");
        assert_eq!(value["data"]["cached"], true);
    }

    #[test]
    fn test_history_view_count() {
        let view = HistoryView::from(vec![record(), record()]);
        assert_eq!(view.count, 2);
        assert_eq!(HistoryView::from(Vec::new()).count, 0);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            AbacusError::DivisionByZero.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AbacusError::NotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AbacusError::store("down").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
