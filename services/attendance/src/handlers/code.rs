use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_auth_types::identity::IdentityHeaders;
use campus_domain::id::{ClassId, CodeId};

use crate::domain::types::{CodeStatus, RemedialCode};
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::code::{CodeStatusUseCase, DeactivateCodeUseCase, IssueCodeUseCase};

#[derive(Serialize)]
pub struct CodeResponse {
    pub id: String,
    pub class_id: String,
    pub code: String,
    pub is_active: bool,
    pub is_valid: bool,
    pub seconds_left: u64,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

impl CodeResponse {
    pub fn new(code: RemedialCode, status: CodeStatus) -> Self {
        Self {
            id: code.id.to_string(),
            class_id: code.class_id.to_string(),
            code: code.code,
            is_active: code.is_active,
            is_valid: status.is_valid,
            seconds_left: status.seconds_left,
            created_at: code.created_at,
            expires_at: code.expires_at,
        }
    }
}

// ── POST /classes/{id}/codes ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct IssueCodeRequest {
    /// One of 15, 30, 60, 120. Defaults to 30.
    pub duration_minutes: Option<u32>,
}

/// The body is optional; a bare POST issues a 30-minute code.
pub async fn issue_code(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<ClassId>,
    body: Option<Json<IssueCodeRequest>>,
) -> Result<(StatusCode, Json<CodeResponse>), AttendanceServiceError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let usecase = IssueCodeUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
        codes: state.code_repo(),
        generator: state.code_generator(),
        clock: state.clock(),
    };
    let code = usecase
        .execute(identity.account_id, class_id, body.duration_minutes)
        .await?;
    let status = code.status_at(code.created_at);
    Ok((StatusCode::CREATED, Json(CodeResponse::new(code, status))))
}

// ── DELETE /classes/{id}/codes/active ────────────────────────────────────────

pub async fn deactivate_code(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<ClassId>,
) -> Result<StatusCode, AttendanceServiceError> {
    let usecase = DeactivateCodeUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
        codes: state.code_repo(),
    };
    usecase.execute(identity.account_id, class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /codes/{id}/status ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CodeStatusResponse {
    pub is_valid: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "campus_core::serde::to_rfc3339_ms_opt"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_left: Option<u64>,
}

/// Unknown codes answer 200 with `{"is_valid": false}`.
pub async fn code_status(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code_id): Path<CodeId>,
) -> Result<Json<CodeStatusResponse>, AttendanceServiceError> {
    let usecase = CodeStatusUseCase {
        codes: state.code_repo(),
        clock: state.clock(),
    };
    let response = match usecase.execute(code_id).await? {
        Some(status) => CodeStatusResponse {
            is_valid: status.is_valid,
            expires_at: Some(status.expires_at),
            seconds_left: Some(status.seconds_left),
        },
        None => CodeStatusResponse {
            is_valid: false,
            expires_at: None,
            seconds_left: None,
        },
    };
    Ok(Json(response))
}
