use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use campus_auth_types::identity::IdentityHeaders;
use campus_domain::id::ClassId;
use campus_domain::pagination::PageRequest;

use crate::domain::types::{ClassDetails, ClassStatus, MakeUpClass};
use crate::error::AttendanceServiceError;
use crate::handlers::code::CodeResponse;
use crate::state::AppState;
use crate::usecase::class::{
    AdvanceStatusUseCase, ClassDetailUseCase, ClassView, DeleteClassUseCase, EditClassUseCase,
    ListClassesUseCase, ScheduleClassUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ClassResponse {
    pub id: String,
    pub faculty_id: String,
    pub subject: String,
    pub topic: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    pub description: String,
    pub status: &'static str,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<MakeUpClass> for ClassResponse {
    fn from(class: MakeUpClass) -> Self {
        let d = class.details;
        Self {
            id: class.id.to_string(),
            faculty_id: class.faculty_id.to_string(),
            subject: d.subject,
            topic: d.topic,
            date: d.date,
            start_time: d.start_time,
            end_time: d.end_time,
            venue: d.venue,
            description: d.description,
            status: class.status.as_str(),
            created_at: class.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ClassListResponse {
    pub items: Vec<ClassResponse>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Serialize)]
pub struct RosterEntry {
    pub student_id: String,
    pub username: String,
    pub full_name: String,
    pub is_present: bool,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub marked_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ClassDetailResponse {
    #[serde(flatten)]
    pub class: ClassResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_code: Option<CodeResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Vec<RosterEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_count: Option<u64>,
    /// Student view only: whether the caller is already marked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked: Option<bool>,
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ClassRequest {
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    #[serde(default)]
    pub description: String,
}

impl From<ClassRequest> for ClassDetails {
    fn from(body: ClassRequest) -> Self {
        Self {
            subject: body.subject,
            topic: body.topic,
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            venue: body.venue,
            description: body.description,
        }
    }
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// ── POST /classes ────────────────────────────────────────────────────────────

pub async fn schedule_class(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<ClassRequest>,
) -> Result<(StatusCode, Json<ClassResponse>), AttendanceServiceError> {
    let usecase = ScheduleClassUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
        clock: state.clock(),
    };
    let class = usecase.execute(identity.account_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(class.into())))
}

// ── GET /classes ─────────────────────────────────────────────────────────────

pub async fn list_classes(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<ClassListResponse>, AttendanceServiceError> {
    let page = page.clamped();
    let usecase = ListClassesUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
    };
    let result = usecase.execute(identity.account_id, page).await?;
    Ok(Json(ClassListResponse {
        items: result.classes.into_iter().map(ClassResponse::from).collect(),
        total: result.total,
        page: page.page,
        per_page: page.per_page,
    }))
}

// ── GET /classes/{id} ────────────────────────────────────────────────────────

pub async fn get_class(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<ClassId>,
) -> Result<Json<ClassDetailResponse>, AttendanceServiceError> {
    let usecase = ClassDetailUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
        codes: state.code_repo(),
        attendance: state.attendance_repo(),
        clock: state.clock(),
    };
    let detail = usecase.execute(identity.account_id, class_id).await?;
    let class = ClassResponse::from(detail.class);
    let response = match detail.view {
        ClassView::Owner {
            active_code,
            roster,
            present_count,
        } => ClassDetailResponse {
            class,
            active_code: active_code.map(|(code, status)| CodeResponse::new(code, status)),
            attendance: Some(
                roster
                    .into_iter()
                    .map(|(record, student)| RosterEntry {
                        student_id: student.id.to_string(),
                        full_name: student.full_name(),
                        username: student.username,
                        is_present: record.is_present,
                        marked_at: record.marked_at,
                    })
                    .collect(),
            ),
            present_count: Some(present_count),
            marked: None,
        },
        ClassView::Student { marked } => ClassDetailResponse {
            class,
            active_code: None,
            attendance: None,
            present_count: None,
            marked: Some(marked),
        },
    };
    Ok(Json(response))
}

// ── PATCH /classes/{id} ──────────────────────────────────────────────────────

pub async fn edit_class(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<ClassId>,
    Json(body): Json<ClassRequest>,
) -> Result<Json<ClassResponse>, AttendanceServiceError> {
    let usecase = EditClassUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
    };
    let class = usecase
        .execute(identity.account_id, class_id, body.into())
        .await?;
    Ok(Json(class.into()))
}

// ── DELETE /classes/{id} ─────────────────────────────────────────────────────

pub async fn delete_class(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<ClassId>,
) -> Result<StatusCode, AttendanceServiceError> {
    let usecase = DeleteClassUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
    };
    usecase.execute(identity.account_id, class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /classes/{id}/status ───────────────────────────────────────────────

pub async fn advance_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<ClassId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<ClassResponse>, AttendanceServiceError> {
    let target: ClassStatus = body.status.trim().parse()?;
    let usecase = AdvanceStatusUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
    };
    let class = usecase.execute(identity.account_id, class_id, target).await?;
    Ok(Json(class.into()))
}
