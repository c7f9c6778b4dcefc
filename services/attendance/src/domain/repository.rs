#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use campus_domain::id::{AccountId, ClassId, CodeId};
use campus_domain::pagination::PageRequest;

use crate::domain::types::{
    Account, AccountUpdate, Attendance, ClassDetails, ClassStatus, MakeUpClass, MarkOutcome,
    Profile, RemedialCode, RotateOutcome,
};
use crate::error::AttendanceServiceError;

/// Repository for accounts and their profiles.
pub trait AccountRepository: Send + Sync {
    /// Insert an account and its profile atomically.
    /// Returns `false` (nothing written) if the username is taken.
    async fn create(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<bool, AttendanceServiceError>;

    async fn find(
        &self,
        id: AccountId,
    ) -> Result<Option<(Account, Profile)>, AttendanceServiceError>;

    async fn find_profile(&self, id: AccountId) -> Result<Option<Profile>, AttendanceServiceError>;

    async fn update(
        &self,
        id: AccountId,
        update: &AccountUpdate,
    ) -> Result<(), AttendanceServiceError>;
}

/// Repository for make-up classes.
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: &MakeUpClass) -> Result<(), AttendanceServiceError>;

    async fn find_by_id(&self, id: ClassId) -> Result<Option<MakeUpClass>, AttendanceServiceError>;

    async fn update_details(
        &self,
        id: ClassId,
        details: &ClassDetails,
    ) -> Result<(), AttendanceServiceError>;

    /// Move the class from `from` to `to` under the class row lock. With
    /// `deactivate_codes`, every active code of the class is switched off in
    /// the same transaction. Returns `false` (nothing written) if the stored
    /// status is no longer `from`.
    async fn set_status(
        &self,
        id: ClassId,
        from: ClassStatus,
        to: ClassStatus,
        deactivate_codes: bool,
    ) -> Result<bool, AttendanceServiceError>;

    /// Delete a class with its codes and attendance. Returns `true` if deleted.
    async fn delete(&self, id: ClassId) -> Result<bool, AttendanceServiceError>;

    /// Classes owned by `faculty_id`, newest date first.
    async fn list_by_faculty(
        &self,
        faculty_id: AccountId,
        page: PageRequest,
    ) -> Result<Vec<MakeUpClass>, AttendanceServiceError>;

    async fn count_by_faculty(&self, faculty_id: AccountId) -> Result<u64, AttendanceServiceError>;
}

/// Repository for remedial codes.
pub trait RemedialCodeRepository: Send + Sync {
    /// Lock the class, deactivate its active codes and insert `code`, all in
    /// one transaction.
    async fn rotate(&self, code: &RemedialCode) -> Result<RotateOutcome, AttendanceServiceError>;

    /// Deactivate every active code for a class. Returns rows changed.
    async fn deactivate_for_class(&self, class_id: ClassId) -> Result<u64, AttendanceServiceError>;

    /// Exact match on the code string.
    async fn find_by_code(&self, code: &str)
    -> Result<Option<RemedialCode>, AttendanceServiceError>;

    async fn find_by_id(&self, id: CodeId) -> Result<Option<RemedialCode>, AttendanceServiceError>;

    async fn find_active_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError>;

    /// Active codes created by `faculty_id`, each with its class.
    async fn list_active_by_creator(
        &self,
        faculty_id: AccountId,
    ) -> Result<Vec<(RemedialCode, MakeUpClass)>, AttendanceServiceError>;
}

/// Repository for the attendance ledger.
pub trait AttendanceRepository: Send + Sync {
    async fn exists(
        &self,
        student_id: AccountId,
        class_id: ClassId,
    ) -> Result<bool, AttendanceServiceError>;

    /// Insert a record. The code named by `remedial_code_id` is re-checked
    /// under a row lock and must still be valid at `marked_at`; otherwise
    /// nothing is written.
    async fn create(&self, record: &Attendance) -> Result<MarkOutcome, AttendanceServiceError>;

    /// Class roster with each student's account, latest first.
    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<(Attendance, Account)>, AttendanceServiceError>;

    /// A student's records with their classes, latest first.
    async fn list_by_student(
        &self,
        student_id: AccountId,
        present_only: bool,
        page: PageRequest,
    ) -> Result<Vec<(Attendance, MakeUpClass)>, AttendanceServiceError>;

    async fn count_present_by_student(
        &self,
        student_id: AccountId,
    ) -> Result<u64, AttendanceServiceError>;

    async fn count_present_by_class(&self, class_id: ClassId)
    -> Result<u64, AttendanceServiceError>;
}

/// Source of candidate remedial code strings.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
