use serde::Deserialize;

use campus_core::config::Config;

/// Attendance service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `ATTENDANCE_PORT`.
    #[serde(default = "default_port")]
    pub attendance_port: u16,
}

fn default_port() -> u16 {
    3120
}

impl Config for AttendanceConfig {}
