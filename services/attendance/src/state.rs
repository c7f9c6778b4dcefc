use sea_orm::DatabaseConnection;

use crate::infra::clock::SystemClock;
use crate::infra::codegen::RandomCodeGenerator;
use crate::infra::db::{
    DbAccountRepository, DbAttendanceRepository, DbClassRepository, DbRemedialCodeRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn class_repo(&self) -> DbClassRepository {
        DbClassRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbRemedialCodeRepository {
        DbRemedialCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn attendance_repo(&self) -> DbAttendanceRepository {
        DbAttendanceRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_generator(&self) -> RandomCodeGenerator {
        RandomCodeGenerator
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
