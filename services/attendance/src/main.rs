use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use campus_attendance::config::AttendanceConfig;
use campus_attendance::router::build_router;
use campus_attendance::state::AppState;
use campus_core::config::Config as _;
use campus_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AttendanceConfig::from_env().context("load attendance config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let router = build_router(AppState { db });
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("attendance service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
