use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use campus_auth_types::identity::IdentityHeaders;
use campus_domain::role::RoleKind;

use crate::domain::types::{Account, Profile};
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::account::{
    GetMeUseCase, RegisterInput, RegisterUseCase, UpdateMeInput, UpdateMeUseCase,
};

#[derive(Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub role: RoleKind,
    pub registration_number: Option<String>,
    pub department: Option<String>,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<(Account, Profile)> for AccountResponse {
    fn from((account, profile): (Account, Profile)) -> Self {
        Self {
            id: account.id.to_string(),
            full_name: account.full_name(),
            username: account.username,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            role: profile.role.kind(),
            registration_number: profile.role.registration_number().map(str::to_owned),
            department: profile.department,
            created_at: account.created_at,
        }
    }
}

// ── POST /accounts ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: RoleKind,
    pub registration_number: Option<String>,
    pub department: Option<String>,
}

/// Open to unauthenticated callers; the gateway forwards sign-ups as-is.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AttendanceServiceError> {
    let usecase = RegisterUseCase {
        accounts: state.account_repo(),
        clock: state.clock(),
    };
    let created = usecase
        .execute(RegisterInput {
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            role: body.role,
            registration_number: body.registration_number,
            department: body.department,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

// ── GET /accounts/@me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, AttendanceServiceError> {
    let usecase = GetMeUseCase {
        accounts: state.account_repo(),
    };
    let me = usecase.execute(identity.account_id).await?;
    Ok(Json(me.into()))
}

// ── PATCH /accounts/@me ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

pub async fn update_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<AccountResponse>, AttendanceServiceError> {
    let usecase = UpdateMeUseCase {
        accounts: state.account_repo(),
    };
    let me = usecase
        .execute(
            identity.account_id,
            UpdateMeInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                department: body.department,
            },
        )
        .await?;
    Ok(Json(me.into()))
}
