use tracing::info;

use campus_domain::id::{AccountId, AttendanceId};
use campus_domain::pagination::PageRequest;

use crate::domain::repository::{
    AccountRepository, AttendanceRepository, Clock, RemedialCodeRepository,
};
use crate::domain::types::{Attendance, MakeUpClass, MarkOutcome, normalize_code};
use crate::error::AttendanceServiceError;
use crate::usecase::require_student;

// ── Redeem ───────────────────────────────────────────────────────────────────

pub struct RedeemUseCase<A, R, T, K>
where
    A: AccountRepository,
    R: RemedialCodeRepository,
    T: AttendanceRepository,
    K: Clock,
{
    pub accounts: A,
    pub codes: R,
    pub attendance: T,
    pub clock: K,
}

impl<A, R, T, K> RedeemUseCase<A, R, T, K>
where
    A: AccountRepository,
    R: RemedialCodeRepository,
    T: AttendanceRepository,
    K: Clock,
{
    /// Mark `actor` present for the class the code belongs to. The code is
    /// not consumed; other students may keep redeeming it while it is valid.
    pub async fn execute(
        &self,
        actor: AccountId,
        raw_code: &str,
    ) -> Result<Attendance, AttendanceServiceError> {
        require_student(&self.accounts, actor).await?;

        let code_str = normalize_code(raw_code);
        if code_str.is_empty() {
            return Err(AttendanceServiceError::validation(
                "code",
                "enter the code shown by your instructor",
            ));
        }

        let code = self
            .codes
            .find_by_code(&code_str)
            .await?
            .ok_or(AttendanceServiceError::InvalidCode)?;
        let now = self.clock.now();
        if !code.is_valid_at(now) {
            return Err(AttendanceServiceError::ExpiredOrInactive);
        }

        let class_id = code.class_id;
        if self.attendance.exists(actor, class_id).await? {
            return Err(AttendanceServiceError::AlreadyMarked { class_id });
        }

        let record = Attendance {
            id: AttendanceId::generate(),
            student_id: actor,
            class_id,
            remedial_code_id: Some(code.id),
            marked_at: now,
            is_present: true,
        };
        // The check above can be overtaken by a concurrent submit or deactivation.
        match self.attendance.create(&record).await? {
            MarkOutcome::Marked => {}
            MarkOutcome::AlreadyMarked => {
                return Err(AttendanceServiceError::AlreadyMarked { class_id });
            }
            MarkOutcome::CodeNoLongerValid => {
                return Err(AttendanceServiceError::ExpiredOrInactive);
            }
        }
        info!(
            student_id = %actor,
            class_id = %class_id,
            code_id = %code.id,
            "attendance marked"
        );
        Ok(record)
    }
}

// ── MyAttendance ─────────────────────────────────────────────────────────────

pub struct AttendancePage {
    pub records: Vec<(Attendance, MakeUpClass)>,
    pub total_present: u64,
}

pub struct MyAttendanceUseCase<A: AccountRepository, T: AttendanceRepository> {
    pub accounts: A,
    pub attendance: T,
}

impl<A: AccountRepository, T: AttendanceRepository> MyAttendanceUseCase<A, T> {
    pub async fn execute(
        &self,
        actor: AccountId,
        page: PageRequest,
    ) -> Result<AttendancePage, AttendanceServiceError> {
        require_student(&self.accounts, actor).await?;
        let records = self.attendance.list_by_student(actor, false, page).await?;
        let total_present = self.attendance.count_present_by_student(actor).await?;
        Ok(AttendancePage {
            records,
            total_present,
        })
    }
}
