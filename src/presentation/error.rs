// API error responses
use crate::infrastructure::document_codec::ImportError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("Export failed: {0}")]
    Export(#[source] serde_json::Error),
    #[error("Failed to build response: {0}")]
    Response(#[from] axum::http::Error),
    #[error("Model store is unavailable after an earlier failure")]
    StoreUnavailable,
    #[error("Model edit did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Import(_) => (StatusCode::BAD_REQUEST, "import_rejected"),
            ApiError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "export_failed"),
            ApiError::Response(_) | ApiError::StoreUnavailable | ApiError::Task(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = ErrorResponse {
            error: ErrorDetail {
                code,
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
