//! Wire error type: maps `FileNodeError` (and a handful of transport-level
//! failures) onto an HTTP status and a small JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filenode_core::FileNodeError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    FileNode(#[from] FileNodeError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Forbidden,
    SpaceLimitExceeded,
    CidNotFound,
    FileNotFound,
    WrongHash,
    BadRequest,
    Unavailable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "Forbidden",
            Self::SpaceLimitExceeded => "SpaceLimitExceeded",
            Self::CidNotFound => "CidNotFound",
            Self::FileNotFound => "FileNotFound",
            Self::WrongHash => "WrongHash",
            Self::BadRequest => "BadRequest",
            Self::Unavailable => "Unavailable",
            Self::Internal => "Internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::SpaceLimitExceeded => StatusCode::PAYLOAD_TOO_LARGE,
            Self::CidNotFound | Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::WrongHash | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::Forbidden(_) => ErrorCode::Forbidden,
            ApiError::BadRequest(_) => ErrorCode::BadRequest,
            ApiError::FileNode(e) => match e {
                FileNodeError::Forbidden(_) => ErrorCode::Forbidden,
                FileNodeError::SpaceLimitExceeded { .. } => ErrorCode::SpaceLimitExceeded,
                FileNodeError::CidNotFound(_) => ErrorCode::CidNotFound,
                FileNodeError::FileNotFound { .. } => ErrorCode::FileNotFound,
                FileNodeError::WrongHash(_) => ErrorCode::WrongHash,
                FileNodeError::Unavailable(_) => ErrorCode::Unavailable,
                FileNodeError::Internal(_) => ErrorCode::Internal,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    request_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = code.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if matches!(code, ErrorCode::Internal) {
            tracing::error!(error = %self, "internal error serving request");
        }

        let body = ErrorBody {
            error: code.as_str(),
            message: self.to_string(),
            request_id,
        };
        (status, Json(body)).into_response()
    }
}
