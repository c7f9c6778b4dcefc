//! Shared in-memory repositories for use case unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use campus_domain::id::{AccountId, ClassId, CodeId};
use campus_domain::pagination::PageRequest;
use campus_domain::role::Role;

use crate::domain::repository::{
    AccountRepository, AttendanceRepository, ClassRepository, Clock, CodeGenerator,
    RemedialCodeRepository,
};
use crate::domain::types::{
    Account, AccountUpdate, Attendance, ClassDetails, ClassStatus, MakeUpClass, MarkOutcome,
    Profile, RemedialCode, RotateOutcome,
};
use crate::error::AttendanceServiceError;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()
}

#[derive(Clone)]
pub(crate) struct MockClock(pub Arc<Mutex<DateTime<Utc>>>);

impl MockClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Hands out the scripted strings in order, then repeats the last one.
pub(crate) struct MockCodeGenerator(pub Mutex<Vec<String>>);

impl MockCodeGenerator {
    pub fn scripted(codes: &[&str]) -> Self {
        let mut codes: Vec<String> = codes.iter().map(|c| (*c).to_owned()).collect();
        codes.reverse();
        Self(Mutex::new(codes))
    }
}

impl CodeGenerator for MockCodeGenerator {
    fn generate(&self) -> String {
        let mut codes = self.0.lock().unwrap();
        if codes.len() > 1 {
            codes.pop().unwrap()
        } else {
            codes.last().cloned().unwrap_or_default()
        }
    }
}

#[derive(Default)]
pub(crate) struct Store {
    pub accounts: Mutex<Vec<(Account, Profile)>>,
    pub classes: Mutex<Vec<MakeUpClass>>,
    pub codes: Mutex<Vec<RemedialCode>>,
    pub attendance: Mutex<Vec<Attendance>>,
}

/// One handle implementing every repository over a shared [`Store`].
#[derive(Clone, Default)]
pub(crate) struct MockRepo(pub Arc<Store>);

impl MockRepo {
    pub fn add_account(&self, role: Role) -> AccountId {
        let id = AccountId::generate();
        let account = Account {
            id,
            username: format!("user-{id}"),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: "user@campus.edu".into(),
            created_at: t0(),
        };
        let profile = Profile {
            account_id: id,
            role,
            department: None,
        };
        self.0.accounts.lock().unwrap().push((account, profile));
        id
    }

    pub fn add_faculty(&self) -> AccountId {
        self.add_account(Role::Faculty)
    }

    pub fn add_student(&self) -> AccountId {
        self.add_account(Role::Student {
            registration_number: "12215454".into(),
        })
    }

    pub fn add_class(&self, faculty_id: AccountId, status: ClassStatus) -> ClassId {
        let class = MakeUpClass {
            id: ClassId::generate(),
            faculty_id,
            details: sample_details(),
            status,
            created_at: t0(),
        };
        let id = class.id;
        self.0.classes.lock().unwrap().push(class);
        id
    }

    pub fn class(&self, id: ClassId) -> MakeUpClass {
        self.0
            .classes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap()
    }

    pub fn active_codes(&self, class_id: ClassId) -> Vec<RemedialCode> {
        self.0
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.class_id == class_id && c.is_active)
            .cloned()
            .collect()
    }
}

pub(crate) fn sample_details() -> ClassDetails {
    ClassDetails {
        subject: "Data Structures".into(),
        topic: "AVL trees".into(),
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        venue: "Block 34, Room 201".into(),
        description: String::new(),
    }
}

fn page_of<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

impl AccountRepository for MockRepo {
    async fn create(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<bool, AttendanceServiceError> {
        let mut rows = self.0.accounts.lock().unwrap();
        if rows.iter().any(|(a, _)| a.username == account.username) {
            return Ok(false);
        }
        rows.push((account.clone(), profile.clone()));
        Ok(true)
    }

    async fn find(
        &self,
        id: AccountId,
    ) -> Result<Option<(Account, Profile)>, AttendanceServiceError> {
        Ok(self
            .0
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(a, _)| a.id == id)
            .cloned())
    }

    async fn find_profile(&self, id: AccountId) -> Result<Option<Profile>, AttendanceServiceError> {
        Ok(AccountRepository::find(self, id).await?.map(|(_, p)| p))
    }

    async fn update(
        &self,
        _id: AccountId,
        _update: &AccountUpdate,
    ) -> Result<(), AttendanceServiceError> {
        Ok(())
    }
}

impl ClassRepository for MockRepo {
    async fn create(&self, class: &MakeUpClass) -> Result<(), AttendanceServiceError> {
        self.0.classes.lock().unwrap().push(class.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<MakeUpClass>, AttendanceServiceError> {
        Ok(self
            .0
            .classes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update_details(
        &self,
        id: ClassId,
        details: &ClassDetails,
    ) -> Result<(), AttendanceServiceError> {
        if let Some(c) = self.0.classes.lock().unwrap().iter_mut().find(|c| c.id == id) {
            c.details = details.clone();
        }
        Ok(())
    }

    async fn set_status(
        &self,
        id: ClassId,
        from: ClassStatus,
        to: ClassStatus,
        deactivate_codes: bool,
    ) -> Result<bool, AttendanceServiceError> {
        let mut classes = self.0.classes.lock().unwrap();
        let Some(class) = classes.iter_mut().find(|c| c.id == id && c.status == from) else {
            return Ok(false);
        };
        class.status = to;
        if deactivate_codes {
            for code in self.0.codes.lock().unwrap().iter_mut() {
                if code.class_id == id {
                    code.is_active = false;
                }
            }
        }
        Ok(true)
    }

    async fn delete(&self, id: ClassId) -> Result<bool, AttendanceServiceError> {
        let mut classes = self.0.classes.lock().unwrap();
        let before = classes.len();
        classes.retain(|c| c.id != id);
        self.0.codes.lock().unwrap().retain(|c| c.class_id != id);
        self.0.attendance.lock().unwrap().retain(|a| a.class_id != id);
        Ok(classes.len() < before)
    }

    async fn list_by_faculty(
        &self,
        faculty_id: AccountId,
        page: PageRequest,
    ) -> Result<Vec<MakeUpClass>, AttendanceServiceError> {
        let mut classes: Vec<_> = self
            .0
            .classes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.faculty_id == faculty_id)
            .cloned()
            .collect();
        classes.sort_by(|a, b| {
            (b.details.date, b.details.start_time).cmp(&(a.details.date, a.details.start_time))
        });
        Ok(page_of(classes, page))
    }

    async fn count_by_faculty(&self, faculty_id: AccountId) -> Result<u64, AttendanceServiceError> {
        Ok(self
            .0
            .classes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.faculty_id == faculty_id)
            .count() as u64)
    }
}

impl RemedialCodeRepository for MockRepo {
    async fn rotate(&self, code: &RemedialCode) -> Result<RotateOutcome, AttendanceServiceError> {
        let open = self
            .0
            .classes
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.id == code.class_id && !c.status.is_terminal());
        if !open {
            return Ok(RotateOutcome::ClassClosed);
        }
        let mut codes = self.0.codes.lock().unwrap();
        if codes.iter().any(|c| c.code == code.code) {
            return Ok(RotateOutcome::CodeTaken);
        }
        for c in codes.iter_mut().filter(|c| c.class_id == code.class_id) {
            c.is_active = false;
        }
        codes.push(code.clone());
        Ok(RotateOutcome::Issued)
    }

    async fn deactivate_for_class(&self, class_id: ClassId) -> Result<u64, AttendanceServiceError> {
        let mut changed = 0;
        for c in self.0.codes.lock().unwrap().iter_mut() {
            if c.class_id == class_id && c.is_active {
                c.is_active = false;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        Ok(self
            .0
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: CodeId) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        Ok(self
            .0
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_active_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        Ok(self.active_codes(class_id).pop())
    }

    async fn list_active_by_creator(
        &self,
        faculty_id: AccountId,
    ) -> Result<Vec<(RemedialCode, MakeUpClass)>, AttendanceServiceError> {
        let codes: Vec<_> = self
            .0
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.created_by == faculty_id && c.is_active)
            .cloned()
            .collect();
        Ok(codes
            .into_iter()
            .rev()
            .map(|c| {
                let class = self.class(c.class_id);
                (c, class)
            })
            .collect())
    }
}

impl AttendanceRepository for MockRepo {
    async fn exists(
        &self,
        student_id: AccountId,
        class_id: ClassId,
    ) -> Result<bool, AttendanceServiceError> {
        Ok(self
            .0
            .attendance
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.student_id == student_id && a.class_id == class_id))
    }

    async fn create(&self, record: &Attendance) -> Result<MarkOutcome, AttendanceServiceError> {
        if let Some(code_id) = record.remedial_code_id {
            let valid = self
                .0
                .codes
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.id == code_id && c.is_valid_at(record.marked_at));
            if !valid {
                return Ok(MarkOutcome::CodeNoLongerValid);
            }
        }
        let mut rows = self.0.attendance.lock().unwrap();
        if rows
            .iter()
            .any(|a| a.student_id == record.student_id && a.class_id == record.class_id)
        {
            return Ok(MarkOutcome::AlreadyMarked);
        }
        rows.push(record.clone());
        Ok(MarkOutcome::Marked)
    }

    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<(Attendance, Account)>, AttendanceServiceError> {
        let records: Vec<_> = self
            .0
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.class_id == class_id)
            .cloned()
            .collect();
        let accounts = self.0.accounts.lock().unwrap();
        Ok(records
            .into_iter()
            .rev()
            .filter_map(|r| {
                let account = accounts.iter().find(|(a, _)| a.id == r.student_id)?.0.clone();
                Some((r, account))
            })
            .collect())
    }

    async fn list_by_student(
        &self,
        student_id: AccountId,
        present_only: bool,
        page: PageRequest,
    ) -> Result<Vec<(Attendance, MakeUpClass)>, AttendanceServiceError> {
        let records: Vec<_> = self
            .0
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id && (a.is_present || !present_only))
            .cloned()
            .collect();
        let rows = records
            .into_iter()
            .rev()
            .map(|r| {
                let class = self.class(r.class_id);
                (r, class)
            })
            .collect();
        Ok(page_of(rows, page))
    }

    async fn count_present_by_student(
        &self,
        student_id: AccountId,
    ) -> Result<u64, AttendanceServiceError> {
        Ok(self
            .0
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id && a.is_present)
            .count() as u64)
    }

    async fn count_present_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<u64, AttendanceServiceError> {
        Ok(self
            .0
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.class_id == class_id && a.is_present)
            .count() as u64)
    }
}
