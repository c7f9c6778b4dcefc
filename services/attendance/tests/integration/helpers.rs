use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use campus_attendance::domain::repository::{
    AccountRepository, AttendanceRepository, ClassRepository, Clock, CodeGenerator,
    RemedialCodeRepository,
};
use campus_attendance::domain::types::{
    Account, AccountUpdate, Attendance, ClassDetails, ClassStatus, MakeUpClass, MarkOutcome,
    Profile, RemedialCode, RotateOutcome,
};
use campus_attendance::error::AttendanceServiceError;
use campus_attendance::usecase::attendance::RedeemUseCase;
use campus_attendance::usecase::class::{AdvanceStatusUseCase, ScheduleClassUseCase};
use campus_attendance::usecase::code::{CodeStatusUseCase, IssueCodeUseCase};
use campus_domain::id::{AccountId, ClassId, CodeId};
use campus_domain::pagination::PageRequest;
use campus_domain::role::Role;

// ── Clock / generator ────────────────────────────────────────────────────────

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct FixedClock(Arc<Mutex<DateTime<Utc>>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Plays back a fixed script of code strings; once exhausted it keeps
/// returning the final entry.
#[derive(Clone)]
pub struct ScriptedCodeGenerator {
    script: Arc<Mutex<(Vec<String>, usize)>>,
}

impl ScriptedCodeGenerator {
    pub fn new(script: &[&str]) -> Self {
        Self {
            script: Arc::new(Mutex::new((
                script.iter().map(|s| (*s).to_owned()).collect(),
                0,
            ))),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.lock().unwrap().1
    }
}

impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self) -> String {
        let mut guard = self.script.lock().unwrap();
        let (script, calls) = &mut *guard;
        let code = script
            .get(*calls)
            .or_else(|| script.last())
            .cloned()
            .unwrap_or_default();
        *calls += 1;
        code
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    accounts: Vec<(Account, Profile)>,
    classes: Vec<MakeUpClass>,
    codes: Vec<RemedialCode>,
    attendance: Vec<Attendance>,
}

/// Every repository over one lock, so each call behaves like a transaction.
/// Honors the unique username, unique code string and unique
/// (student, class) constraints, and cascades class deletes.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<Tables>>);

impl MemoryStore {
    pub fn faculty(&self) -> AccountId {
        self.account(Role::Faculty)
    }

    pub fn student(&self, registration_number: &str) -> AccountId {
        self.account(Role::Student {
            registration_number: registration_number.to_owned(),
        })
    }

    fn account(&self, role: Role) -> AccountId {
        let id = AccountId::generate();
        let account = Account {
            id,
            username: id.to_string(),
            first_name: "Sam".into(),
            last_name: "Lee".into(),
            email: format!("{id}@campus.edu"),
            created_at: start(),
        };
        let profile = Profile {
            account_id: id,
            role,
            department: Some("CSE".into()),
        };
        self.0.lock().unwrap().accounts.push((account, profile));
        id
    }

    pub fn codes_for(&self, class_id: ClassId) -> Vec<RemedialCode> {
        self.0
            .lock()
            .unwrap()
            .codes
            .iter()
            .filter(|c| c.class_id == class_id)
            .cloned()
            .collect()
    }

    pub fn active_count(&self, class_id: ClassId) -> usize {
        self.codes_for(class_id).iter().filter(|c| c.is_active).count()
    }

    pub fn attendance_rows(&self) -> usize {
        self.0.lock().unwrap().attendance.len()
    }

    pub fn class_status(&self, class_id: ClassId) -> Option<ClassStatus> {
        self.0
            .lock()
            .unwrap()
            .classes
            .iter()
            .find(|c| c.id == class_id)
            .map(|c| c.status)
    }
}

fn paginate<T>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

impl AccountRepository for MemoryStore {
    async fn create(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<bool, AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        if t.accounts.iter().any(|(a, _)| a.username == account.username) {
            return Ok(false);
        }
        t.accounts.push((account.clone(), profile.clone()));
        Ok(true)
    }

    async fn find(
        &self,
        id: AccountId,
    ) -> Result<Option<(Account, Profile)>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.accounts.iter().find(|(a, _)| a.id == id).cloned())
    }

    async fn find_profile(&self, id: AccountId) -> Result<Option<Profile>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.accounts
            .iter()
            .find(|(a, _)| a.id == id)
            .map(|(_, p)| p.clone()))
    }

    async fn update(
        &self,
        id: AccountId,
        update: &AccountUpdate,
    ) -> Result<(), AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        let Some((account, profile)) = t.accounts.iter_mut().find(|(a, _)| a.id == id) else {
            return Ok(());
        };
        if let Some(v) = &update.first_name {
            account.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            account.last_name = v.clone();
        }
        if let Some(v) = &update.email {
            account.email = v.clone();
        }
        if let Some(v) = &update.department {
            profile.department = v.clone();
        }
        Ok(())
    }
}

impl ClassRepository for MemoryStore {
    async fn create(&self, class: &MakeUpClass) -> Result<(), AttendanceServiceError> {
        self.0.lock().unwrap().classes.push(class.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<MakeUpClass>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.classes.iter().find(|c| c.id == id).cloned())
    }

    async fn update_details(
        &self,
        id: ClassId,
        details: &ClassDetails,
    ) -> Result<(), AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        if let Some(class) = t.classes.iter_mut().find(|c| c.id == id) {
            class.details = details.clone();
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
        let mut t = self.0.lock().unwrap();
        let Some(class) = t.classes.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if class.status != from {
            return Ok(false);
        }
        class.status = to;
        if deactivate_codes {
            t.codes
                .iter_mut()
                .filter(|c| c.class_id == id)
                .for_each(|c| c.is_active = false);
        }
        Ok(true)
    }

    async fn delete(&self, id: ClassId) -> Result<bool, AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        let before = t.classes.len();
        t.classes.retain(|c| c.id != id);
        t.codes.retain(|c| c.class_id != id);
        t.attendance.retain(|a| a.class_id != id);
        Ok(t.classes.len() != before)
    }

    async fn list_by_faculty(
        &self,
        faculty_id: AccountId,
        page: PageRequest,
    ) -> Result<Vec<MakeUpClass>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        let mut rows: Vec<_> = t
            .classes
            .iter()
            .filter(|c| c.faculty_id == faculty_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| std::cmp::Reverse((c.details.date, c.details.start_time)));
        Ok(paginate(rows, page))
    }

    async fn count_by_faculty(&self, faculty_id: AccountId) -> Result<u64, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.classes.iter().filter(|c| c.faculty_id == faculty_id).count() as u64)
    }
}

impl RemedialCodeRepository for MemoryStore {
    async fn rotate(&self, code: &RemedialCode) -> Result<RotateOutcome, AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        let open = t
            .classes
            .iter()
            .find(|c| c.id == code.class_id)
            .is_some_and(|c| !c.status.is_terminal());
        if !open {
            return Ok(RotateOutcome::ClassClosed);
        }
        if t.codes.iter().any(|c| c.code == code.code) {
            return Ok(RotateOutcome::CodeTaken);
        }
        t.codes
            .iter_mut()
            .filter(|c| c.class_id == code.class_id)
            .for_each(|c| c.is_active = false);
        t.codes.push(code.clone());
        Ok(RotateOutcome::Issued)
    }

    async fn deactivate_for_class(&self, class_id: ClassId) -> Result<u64, AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        let mut changed = 0;
        for c in t.codes.iter_mut().filter(|c| c.class_id == class_id && c.is_active) {
            c.is_active = false;
            changed += 1;
        }
        Ok(changed)
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.codes.iter().find(|c| c.code == code).cloned())
    }

    async fn find_by_id(&self, id: CodeId) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.codes.iter().find(|c| c.id == id).cloned())
    }

    async fn find_active_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.codes
            .iter()
            .find(|c| c.class_id == class_id && c.is_active)
            .cloned())
    }

    async fn list_active_by_creator(
        &self,
        faculty_id: AccountId,
    ) -> Result<Vec<(RemedialCode, MakeUpClass)>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.codes
            .iter()
            .rev()
            .filter(|c| c.created_by == faculty_id && c.is_active)
            .filter_map(|c| {
                let class = t.classes.iter().find(|k| k.id == c.class_id)?;
                Some((c.clone(), class.clone()))
            })
            .collect())
    }
}

impl AttendanceRepository for MemoryStore {
    async fn exists(
        &self,
        student_id: AccountId,
        class_id: ClassId,
    ) -> Result<bool, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.attendance
            .iter()
            .any(|a| a.student_id == student_id && a.class_id == class_id))
    }

    async fn create(&self, record: &Attendance) -> Result<MarkOutcome, AttendanceServiceError> {
        let mut t = self.0.lock().unwrap();
        if let Some(code_id) = record.remedial_code_id {
            let valid = t
                .codes
                .iter()
                .any(|c| c.id == code_id && c.is_valid_at(record.marked_at));
            if !valid {
                return Ok(MarkOutcome::CodeNoLongerValid);
            }
        }
        let duplicate = t
            .attendance
            .iter()
            .any(|a| a.student_id == record.student_id && a.class_id == record.class_id);
        if duplicate {
            return Ok(MarkOutcome::AlreadyMarked);
        }
        t.attendance.push(record.clone());
        Ok(MarkOutcome::Marked)
    }

    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<(Attendance, Account)>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        let mut rows: Vec<_> = t
            .attendance
            .iter()
            .filter(|a| a.class_id == class_id)
            .filter_map(|a| {
                let (account, _) = t.accounts.iter().find(|(x, _)| x.id == a.student_id)?;
                Some((a.clone(), account.clone()))
            })
            .collect();
        rows.sort_by_key(|(a, _)| std::cmp::Reverse(a.marked_at));
        Ok(rows)
    }

    async fn list_by_student(
        &self,
        student_id: AccountId,
        present_only: bool,
        page: PageRequest,
    ) -> Result<Vec<(Attendance, MakeUpClass)>, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        let mut rows: Vec<_> = t
            .attendance
            .iter()
            .filter(|a| a.student_id == student_id && (a.is_present || !present_only))
            .filter_map(|a| {
                let class = t.classes.iter().find(|c| c.id == a.class_id)?;
                Some((a.clone(), class.clone()))
            })
            .collect();
        rows.sort_by_key(|(a, _)| std::cmp::Reverse(a.marked_at));
        Ok(paginate(rows, page))
    }

    async fn count_present_by_student(
        &self,
        student_id: AccountId,
    ) -> Result<u64, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.attendance
            .iter()
            .filter(|a| a.student_id == student_id && a.is_present)
            .count() as u64)
    }

    async fn count_present_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<u64, AttendanceServiceError> {
        let t = self.0.lock().unwrap();
        Ok(t.attendance
            .iter()
            .filter(|a| a.class_id == class_id && a.is_present)
            .count() as u64)
    }
}

// ── Use case wiring ──────────────────────────────────────────────────────────

pub fn details() -> ClassDetails {
    ClassDetails {
        subject: "Operating Systems".into(),
        topic: "Page replacement".into(),
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        venue: "Block 32, Room 105".into(),
        description: "Bring last week's notes".into(),
    }
}

pub async fn schedule(store: &MemoryStore, clock: &FixedClock, faculty: AccountId) -> ClassId {
    ScheduleClassUseCase {
        accounts: store.clone(),
        classes: store.clone(),
        clock: clock.clone(),
    }
    .execute(faculty, details())
    .await
    .unwrap()
    .id
}

pub fn issuer(
    store: &MemoryStore,
    generator: &ScriptedCodeGenerator,
    clock: &FixedClock,
) -> IssueCodeUseCase<MemoryStore, MemoryStore, MemoryStore, ScriptedCodeGenerator, FixedClock> {
    IssueCodeUseCase {
        accounts: store.clone(),
        classes: store.clone(),
        codes: store.clone(),
        generator: generator.clone(),
        clock: clock.clone(),
    }
}

pub fn redeemer(
    store: &MemoryStore,
    clock: &FixedClock,
) -> RedeemUseCase<MemoryStore, MemoryStore, MemoryStore, FixedClock> {
    RedeemUseCase {
        accounts: store.clone(),
        codes: store.clone(),
        attendance: store.clone(),
        clock: clock.clone(),
    }
}

pub fn status_advancer(store: &MemoryStore) -> AdvanceStatusUseCase<MemoryStore, MemoryStore> {
    AdvanceStatusUseCase {
        accounts: store.clone(),
        classes: store.clone(),
    }
}

pub fn status_checker(
    store: &MemoryStore,
    clock: &FixedClock,
) -> CodeStatusUseCase<MemoryStore, FixedClock> {
    CodeStatusUseCase {
        codes: store.clone(),
        clock: clock.clone(),
    }
}
