use campus_domain::id::AccountId;
use campus_domain::pagination::PageRequest;
use campus_domain::role::Role;

use crate::domain::repository::{
    AccountRepository, AttendanceRepository, ClassRepository, Clock, RemedialCodeRepository,
};
use crate::domain::types::{
    Attendance, CodeStatus, DASHBOARD_RECENT, MakeUpClass, RemedialCode,
};
use crate::error::AttendanceServiceError;
use crate::usecase::require_profile;

pub struct ActiveCodeSummary {
    pub code: RemedialCode,
    pub status: CodeStatus,
    pub class: MakeUpClass,
}

pub enum Dashboard {
    Faculty {
        recent_classes: Vec<MakeUpClass>,
        total_classes: u64,
        active_codes: Vec<ActiveCodeSummary>,
    },
    Student {
        recent_attendance: Vec<(Attendance, MakeUpClass)>,
        total_present: u64,
    },
}

pub struct DashboardUseCase<A, C, R, T, K>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
    T: AttendanceRepository,
    K: Clock,
{
    pub accounts: A,
    pub classes: C,
    pub codes: R,
    pub attendance: T,
    pub clock: K,
}

impl<A, C, R, T, K> DashboardUseCase<A, C, R, T, K>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
    T: AttendanceRepository,
    K: Clock,
{
    pub async fn execute(&self, actor: AccountId) -> Result<Dashboard, AttendanceServiceError> {
        let profile = require_profile(&self.accounts, actor).await?;
        let recent = PageRequest::first(DASHBOARD_RECENT);

        match profile.role {
            Role::Student { .. } => {
                let recent_attendance =
                    self.attendance.list_by_student(actor, true, recent).await?;
                let total_present = self.attendance.count_present_by_student(actor).await?;
                Ok(Dashboard::Student {
                    recent_attendance,
                    total_present,
                })
            }
            Role::Faculty => {
                let recent_classes = self.classes.list_by_faculty(actor, recent).await?;
                let total_classes = self.classes.count_by_faculty(actor).await?;
                let now = self.clock.now();
                let active_codes = self
                    .codes
                    .list_active_by_creator(actor)
                    .await?
                    .into_iter()
                    .map(|(code, class)| ActiveCodeSummary {
                        status: code.status_at(now),
                        code,
                        class,
                    })
                    .collect();
                Ok(Dashboard::Faculty {
                    recent_classes,
                    total_classes,
                    active_codes,
                })
            }
        }
    }
}
