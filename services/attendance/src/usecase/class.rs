use tracing::info;

use campus_domain::id::{AccountId, ClassId};
use campus_domain::pagination::PageRequest;
use campus_domain::role::Role;

use crate::domain::repository::{
    AccountRepository, AttendanceRepository, ClassRepository, Clock, RemedialCodeRepository,
};
use crate::domain::types::{
    Account, Attendance, ClassDetails, ClassStatus, CodeStatus, MakeUpClass, RemedialCode,
};
use crate::error::AttendanceServiceError;
use crate::usecase::{require_faculty, require_owned_class, require_profile};

// ── ScheduleClass ────────────────────────────────────────────────────────────

pub struct ScheduleClassUseCase<A, C, K>
where
    A: AccountRepository,
    C: ClassRepository,
    K: Clock,
{
    pub accounts: A,
    pub classes: C,
    pub clock: K,
}

impl<A, C, K> ScheduleClassUseCase<A, C, K>
where
    A: AccountRepository,
    C: ClassRepository,
    K: Clock,
{
    pub async fn execute(
        &self,
        actor: AccountId,
        details: ClassDetails,
    ) -> Result<MakeUpClass, AttendanceServiceError> {
        require_faculty(&self.accounts, actor).await?;
        let class = MakeUpClass {
            id: ClassId::generate(),
            faculty_id: actor,
            details: details.validated()?,
            status: ClassStatus::Upcoming,
            created_at: self.clock.now(),
        };
        self.classes.create(&class).await?;
        info!(class_id = %class.id, faculty_id = %actor, "make-up class scheduled");
        Ok(class)
    }
}

// ── ListClasses ──────────────────────────────────────────────────────────────

pub struct ClassPage {
    pub classes: Vec<MakeUpClass>,
    pub total: u64,
}

pub struct ListClassesUseCase<A: AccountRepository, C: ClassRepository> {
    pub accounts: A,
    pub classes: C,
}

impl<A: AccountRepository, C: ClassRepository> ListClassesUseCase<A, C> {
    pub async fn execute(
        &self,
        actor: AccountId,
        page: PageRequest,
    ) -> Result<ClassPage, AttendanceServiceError> {
        require_faculty(&self.accounts, actor).await?;
        let classes = self.classes.list_by_faculty(actor, page).await?;
        let total = self.classes.count_by_faculty(actor).await?;
        Ok(ClassPage { classes, total })
    }
}

// ── ClassDetail ──────────────────────────────────────────────────────────────

/// What the caller may see beyond the class itself.
pub enum ClassView {
    /// The owning faculty sees the live code and the full roster.
    Owner {
        active_code: Option<(RemedialCode, CodeStatus)>,
        roster: Vec<(Attendance, Account)>,
        present_count: u64,
    },
    /// Students only learn whether they are already marked.
    Student { marked: bool },
}

pub struct ClassDetail {
    pub class: MakeUpClass,
    pub view: ClassView,
}

pub struct ClassDetailUseCase<A, C, R, T, K>
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

impl<A, C, R, T, K> ClassDetailUseCase<A, C, R, T, K>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
    T: AttendanceRepository,
    K: Clock,
{
    pub async fn execute(
        &self,
        actor: AccountId,
        class_id: ClassId,
    ) -> Result<ClassDetail, AttendanceServiceError> {
        let profile = require_profile(&self.accounts, actor).await?;
        let class = self
            .classes
            .find_by_id(class_id)
            .await?
            .ok_or(AttendanceServiceError::ClassNotFound)?;

        match profile.role {
            Role::Student { .. } => {
                let marked = self.attendance.exists(actor, class_id).await?;
                return Ok(ClassDetail {
                    class,
                    view: ClassView::Student { marked },
                });
            }
            Role::Faculty if !class.is_owned_by(actor) => {
                return Err(AttendanceServiceError::Forbidden);
            }
            Role::Faculty => {}
        }

        let now = self.clock.now();
        let active_code = self
            .codes
            .find_active_for_class(class_id)
            .await?
            .map(|code| {
                let status = code.status_at(now);
                (code, status)
            });
        let roster = self.attendance.list_by_class(class_id).await?;
        let present_count = self.attendance.count_present_by_class(class_id).await?;
        Ok(ClassDetail {
            class,
            view: ClassView::Owner {
                active_code,
                roster,
                present_count,
            },
        })
    }
}

// ── EditClass ────────────────────────────────────────────────────────────────

pub struct EditClassUseCase<A: AccountRepository, C: ClassRepository> {
    pub accounts: A,
    pub classes: C,
}

impl<A: AccountRepository, C: ClassRepository> EditClassUseCase<A, C> {
    pub async fn execute(
        &self,
        actor: AccountId,
        class_id: ClassId,
        details: ClassDetails,
    ) -> Result<MakeUpClass, AttendanceServiceError> {
        let mut class = require_owned_class(&self.accounts, &self.classes, actor, class_id).await?;
        let details = details.validated()?;
        self.classes.update_details(class_id, &details).await?;
        info!(class_id = %class_id, "make-up class updated");
        class.details = details;
        Ok(class)
    }
}

// ── DeleteClass ──────────────────────────────────────────────────────────────

pub struct DeleteClassUseCase<A: AccountRepository, C: ClassRepository> {
    pub accounts: A,
    pub classes: C,
}

impl<A: AccountRepository, C: ClassRepository> DeleteClassUseCase<A, C> {
    pub async fn execute(
        &self,
        actor: AccountId,
        class_id: ClassId,
    ) -> Result<(), AttendanceServiceError> {
        require_owned_class(&self.accounts, &self.classes, actor, class_id).await?;
        if !self.classes.delete(class_id).await? {
            return Err(AttendanceServiceError::ClassNotFound);
        }
        info!(class_id = %class_id, "make-up class deleted");
        Ok(())
    }
}

// ── AdvanceStatus ────────────────────────────────────────────────────────────

pub struct AdvanceStatusUseCase<A: AccountRepository, C: ClassRepository> {
    pub accounts: A,
    pub classes: C,
}

impl<A: AccountRepository, C: ClassRepository> AdvanceStatusUseCase<A, C> {
    pub async fn execute(
        &self,
        actor: AccountId,
        class_id: ClassId,
        target: ClassStatus,
    ) -> Result<MakeUpClass, AttendanceServiceError> {
        let mut class = require_owned_class(&self.accounts, &self.classes, actor, class_id).await?;
        let from = class.status;
        if !from.can_transition_to(target) {
            return Err(AttendanceServiceError::InvalidTransition { from, to: target });
        }

        // Leaving the open states ends redemption for the class.
        let deactivate_codes = target.is_terminal();
        if !self
            .classes
            .set_status(class_id, from, target, deactivate_codes)
            .await?
        {
            // Someone else moved the class first; report against what is stored now.
            let current = self
                .classes
                .find_by_id(class_id)
                .await?
                .ok_or(AttendanceServiceError::ClassNotFound)?;
            return Err(AttendanceServiceError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        info!(class_id = %class_id, from = %from, to = %target, "make-up class status advanced");
        class.status = target;
        Ok(class)
    }
}
