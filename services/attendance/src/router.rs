use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use campus_core::health::{healthz, readiness};
use campus_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{get_me, register, update_me},
    attendance::{my_attendance, redeem},
    class::{advance_status, delete_class, edit_class, get_class, list_classes, schedule_class},
    code::{code_status, deactivate_code, issue_code},
    dashboard::get_dashboard,
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/accounts", post(register))
        .route("/accounts/@me", get(get_me))
        .route("/accounts/@me", patch(update_me))
        // Dashboard
        .route("/dashboard", get(get_dashboard))
        // Classes
        .route("/classes", get(list_classes))
        .route("/classes", post(schedule_class))
        .route("/classes/{id}", get(get_class))
        .route("/classes/{id}", patch(edit_class))
        .route("/classes/{id}", delete(delete_class))
        .route("/classes/{id}/status", patch(advance_status))
        // Remedial codes
        .route("/classes/{id}/codes", post(issue_code))
        .route("/classes/{id}/codes/active", delete(deactivate_code))
        .route("/codes/{id}/status", get(code_status))
        // Attendance
        .route("/attendance", post(redeem))
        .route("/attendance/@me", get(my_attendance))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
