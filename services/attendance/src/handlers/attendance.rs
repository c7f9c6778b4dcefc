use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_auth_types::identity::IdentityHeaders;
use campus_domain::pagination::PageRequest;

use crate::domain::types::{Attendance, MakeUpClass};
use crate::error::AttendanceServiceError;
use crate::handlers::class::ClassResponse;
use crate::state::AppState;
use crate::usecase::attendance::{MyAttendanceUseCase, RedeemUseCase};

#[derive(Serialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub class_id: String,
    pub remedial_code_id: Option<String>,
    pub is_present: bool,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub marked_at: DateTime<Utc>,
}

impl From<Attendance> for AttendanceResponse {
    fn from(record: Attendance) -> Self {
        Self {
            id: record.id.to_string(),
            class_id: record.class_id.to_string(),
            remedial_code_id: record.remedial_code_id.map(|id| id.to_string()),
            is_present: record.is_present,
            marked_at: record.marked_at,
        }
    }
}

/// An attendance record together with the class it belongs to.
#[derive(Serialize)]
pub struct AttendanceWithClass {
    #[serde(flatten)]
    pub record: AttendanceResponse,
    pub class: ClassResponse,
}

impl From<(Attendance, MakeUpClass)> for AttendanceWithClass {
    fn from((record, class): (Attendance, MakeUpClass)) -> Self {
        Self {
            record: record.into(),
            class: class.into(),
        }
    }
}

// ── POST /attendance ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

pub async fn redeem(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RedeemRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), AttendanceServiceError> {
    let usecase = RedeemUseCase {
        accounts: state.account_repo(),
        codes: state.code_repo(),
        attendance: state.attendance_repo(),
        clock: state.clock(),
    };
    let record = usecase.execute(identity.account_id, &body.code).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

// ── GET /attendance/@me ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MyAttendanceResponse {
    pub items: Vec<AttendanceWithClass>,
    pub total_present: u64,
    pub page: u32,
    pub per_page: u32,
}

pub async fn my_attendance(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<MyAttendanceResponse>, AttendanceServiceError> {
    let page = page.clamped();
    let usecase = MyAttendanceUseCase {
        accounts: state.account_repo(),
        attendance: state.attendance_repo(),
    };
    let result = usecase.execute(identity.account_id, page).await?;
    Ok(Json(MyAttendanceResponse {
        items: result.records.into_iter().map(Into::into).collect(),
        total_present: result.total_present,
        page: page.page,
        per_page: page.per_page,
    }))
}
