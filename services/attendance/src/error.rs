use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use campus_domain::id::ClassId;

use crate::domain::types::{ClassStatus, MAX_CODE_ATTEMPTS};

/// Attendance service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("account not found")]
    AccountNotFound,
    #[error("make-up class not found")]
    ClassNotFound,
    #[error("username already taken")]
    AccountAlreadyExists,
    #[error("forbidden")]
    Forbidden,
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("code duration must be one of 15, 30, 60 or 120 minutes")]
    InvalidDuration,
    #[error("cannot move class from {from} to {to}")]
    InvalidTransition { from: ClassStatus, to: ClassStatus },
    #[error("class is no longer accepting codes")]
    ClassClosed,
    #[error("code is not valid")]
    InvalidCode,
    #[error("code has expired or been deactivated")]
    ExpiredOrInactive,
    #[error("attendance already marked for this class")]
    AlreadyMarked { class_id: ClassId },
    #[error("could not generate a unique code after {} attempts", MAX_CODE_ATTEMPTS)]
    CodeGenerationExhausted,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::ClassNotFound => "CLASS_NOT_FOUND",
            Self::AccountAlreadyExists => "ACCOUNT_ALREADY_EXISTS",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ClassClosed => "CLASS_CLOSED",
            Self::InvalidCode => "INVALID_CODE",
            Self::ExpiredOrInactive => "EXPIRED_OR_INACTIVE",
            Self::AlreadyMarked { .. } => "ALREADY_MARKED",
            Self::CodeGenerationExhausted => "CODE_GENERATION_EXHAUSTED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::AccountNotFound | Self::ClassNotFound => StatusCode::NOT_FOUND,
            Self::AccountAlreadyExists
            | Self::InvalidTransition { .. }
            | Self::ClassClosed
            | Self::AlreadyMarked { .. } => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation { .. } | Self::InvalidDuration | Self::InvalidCode => {
                StatusCode::BAD_REQUEST
            }
            Self::ExpiredOrInactive => StatusCode::GONE,
            Self::CodeGenerationExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client outcomes; TraceLayer already records them.
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = "INTERNAL", "internal error"),
            Self::CodeGenerationExhausted => {
                tracing::error!(kind = self.kind(), "remedial code space exhausted")
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::Validation { field, .. } => body["field"] = serde_json::json!(field),
            Self::AlreadyMarked { class_id } => {
                body["class_id"] = serde_json::json!(class_id.to_string())
            }
            _ => {}
        }
        (status, axum::Json(body)).into_response()
    }
}
