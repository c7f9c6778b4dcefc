use axum::{Json, extract::State};
use serde::Serialize;

use campus_auth_types::identity::IdentityHeaders;

use crate::error::AttendanceServiceError;
use crate::handlers::attendance::AttendanceWithClass;
use crate::handlers::class::ClassResponse;
use crate::handlers::code::CodeResponse;
use crate::state::AppState;
use crate::usecase::dashboard::{Dashboard, DashboardUseCase};

#[derive(Serialize)]
pub struct ActiveCodeResponse {
    #[serde(flatten)]
    pub code: CodeResponse,
    pub class: ClassResponse,
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardResponse {
    Faculty {
        recent_classes: Vec<ClassResponse>,
        total_classes: u64,
        active_codes: Vec<ActiveCodeResponse>,
    },
    Student {
        recent_attendance: Vec<AttendanceWithClass>,
        total_present: u64,
    },
}

// ── GET /dashboard ───────────────────────────────────────────────────────────

pub async fn get_dashboard(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AttendanceServiceError> {
    let usecase = DashboardUseCase {
        accounts: state.account_repo(),
        classes: state.class_repo(),
        codes: state.code_repo(),
        attendance: state.attendance_repo(),
        clock: state.clock(),
    };
    let response = match usecase.execute(identity.account_id).await? {
        Dashboard::Faculty {
            recent_classes,
            total_classes,
            active_codes,
        } => DashboardResponse::Faculty {
            recent_classes: recent_classes.into_iter().map(Into::into).collect(),
            total_classes,
            active_codes: active_codes
                .into_iter()
                .map(|summary| ActiveCodeResponse {
                    code: CodeResponse::new(summary.code, summary.status),
                    class: summary.class.into(),
                })
                .collect(),
        },
        Dashboard::Student {
            recent_attendance,
            total_present,
        } => DashboardResponse::Student {
            recent_attendance: recent_attendance.into_iter().map(Into::into).collect(),
            total_present,
        },
    };
    Ok(Json(response))
}
