//! # HTTP Error Mapping
//!
//! One mapping from [`BridgeError`] to status codes, applied uniformly by
//! every handler. Deterministic rejections (reverts, insufficient
//! allowance, malformed input) are the caller's fault and map to 4xx;
//! transport trouble maps to 502 so a dashboard can distinguish "the node
//! is down" from "your request is wrong".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shared_types::BridgeError;

/// Error payload returned by every failing endpoint.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// A 400 for input the handlers reject before touching the ledger.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    /// Status this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Human-readable detail line.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        let status = match &err {
            BridgeError::Connectivity(_) => StatusCode::BAD_GATEWAY,
            BridgeError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::ExecutionReverted { .. }
            | BridgeError::AllowanceInsufficient { .. }
            | BridgeError::SchemaMismatch { .. } => StatusCode::BAD_REQUEST,
            BridgeError::NonceConflict { .. } => StatusCode::CONFLICT,
            BridgeError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "detail": self.detail,
        }));
        (self.status, body).into_response()
    }
}
