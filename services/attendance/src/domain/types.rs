use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use campus_domain::id::{AccountId, AttendanceId, ClassId, CodeId};
use campus_domain::role::Role;

use crate::error::AttendanceServiceError;

/// Remedial code length in characters.
pub const CODE_LEN: usize = 6;

/// Alphabet remedial codes are drawn from (uppercase alphanumeric, 36 symbols).
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Attempts at generating an unused code string before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Number of recent items shown on either dashboard.
pub const DASHBOARD_RECENT: u32 = 5;

pub const SUBJECT_MAX_LEN: usize = 150;
pub const TOPIC_MAX_LEN: usize = 200;
pub const VENUE_MAX_LEN: usize = 100;
pub const DEPARTMENT_MAX_LEN: usize = 100;
pub const USERNAME_MAX_LEN: usize = 150;
pub const NAME_MAX_LEN: usize = 50;

/// Campus account as known to this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Role-bearing profile attached to every account. The role never changes
/// after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub account_id: AccountId,
    pub role: Role,
    pub department: Option<String>,
}

impl Profile {
    pub fn is_faculty(&self) -> bool {
        self.role.is_faculty()
    }

    pub fn is_student(&self) -> bool {
        self.role.is_student()
    }
}

/// Mutable account fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the department.
    pub department: Option<Option<String>>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
    }
}

// ── Make-up classes ──────────────────────────────────────────────────────────

/// Lifecycle of a make-up class. Transitions are always owner-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl ClassStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// `upcoming → active → completed`, and `cancelled` from either
    /// non-terminal state.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Upcoming, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Upcoming | Self::Active, Self::Cancelled)
        )
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassStatus {
    type Err = AttendanceServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AttendanceServiceError::validation(
                "status",
                "status must be one of upcoming, active, completed, cancelled",
            )),
        }
    }
}

/// Editable description of a class session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDetails {
    pub subject: String,
    pub topic: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    pub description: String,
}

impl ClassDetails {
    /// Trim text fields and check lengths and the time window.
    pub fn validated(mut self) -> Result<Self, AttendanceServiceError> {
        self.subject = self.subject.trim().to_owned();
        self.topic = self.topic.trim().to_owned();
        self.venue = self.venue.trim().to_owned();
        self.description = self.description.trim().to_owned();

        required("subject", &self.subject, SUBJECT_MAX_LEN)?;
        max_len("topic", &self.topic, TOPIC_MAX_LEN)?;
        required("venue", &self.venue, VENUE_MAX_LEN)?;
        if self.start_time >= self.end_time {
            return Err(AttendanceServiceError::validation(
                "end_time",
                "end time must be after start time",
            ));
        }
        Ok(self)
    }
}

/// A make-up class owned by one faculty account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeUpClass {
    pub id: ClassId,
    pub faculty_id: AccountId,
    pub details: ClassDetails,
    pub status: ClassStatus,
    pub created_at: DateTime<Utc>,
}

impl MakeUpClass {
    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.faculty_id == account_id
    }
}

// ── Remedial codes ───────────────────────────────────────────────────────────

/// How long a freshly issued code stays redeemable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeDuration {
    Minutes15,
    #[default]
    Minutes30,
    Minutes60,
    Minutes120,
}

impl CodeDuration {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        match minutes {
            15 => Some(Self::Minutes15),
            30 => Some(Self::Minutes30),
            60 => Some(Self::Minutes60),
            120 => Some(Self::Minutes120),
            _ => None,
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            Self::Minutes15 => 15,
            Self::Minutes30 => 30,
            Self::Minutes60 => 60,
            Self::Minutes120 => 120,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }
}

/// Short shared code students redeem to mark attendance for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemedialCode {
    pub id: CodeId,
    pub class_id: ClassId,
    pub code: String,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl RemedialCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Redeemable iff still active and `now <= expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Whole seconds until expiry, floored at zero.
    pub fn seconds_left_at(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((self.expires_at - now).num_seconds()).unwrap_or(0)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> CodeStatus {
        CodeStatus {
            is_valid: self.is_valid_at(now),
            expires_at: self.expires_at,
            seconds_left: self.seconds_left_at(now),
        }
    }
}

/// Snapshot used by clients to poll a code and render a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeStatus {
    pub is_valid: bool,
    pub expires_at: DateTime<Utc>,
    pub seconds_left: u64,
}

/// Result of the atomic deactivate-then-insert step of code issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateOutcome {
    /// Previous codes deactivated and the new code stored.
    Issued,
    /// The code string is already in use; nothing was written.
    CodeTaken,
    /// The class finished or was cancelled before the lock was taken.
    ClassClosed,
}

/// Result of storing an attendance record against the code it was redeemed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    /// The student already has a record for the class; nothing was written.
    AlreadyMarked,
    /// The code was deactivated or expired before the row was written.
    CodeNoLongerValid,
}

/// Trim and uppercase raw user input before lookup.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

// ── Attendance ───────────────────────────────────────────────────────────────

/// A student's attendance at one make-up class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: AccountId,
    pub class_id: ClassId,
    /// `None` once the redeemed code row has been deleted.
    pub remedial_code_id: Option<CodeId>,
    pub marked_at: DateTime<Utc>,
    pub is_present: bool,
}

// ── Field validation helpers ─────────────────────────────────────────────────

pub(crate) fn required(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), AttendanceServiceError> {
    if value.trim().is_empty() {
        return Err(AttendanceServiceError::validation(
            field,
            "this field is required",
        ));
    }
    max_len(field, value, max)
}

pub(crate) fn max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), AttendanceServiceError> {
    if value.chars().count() > max {
        return Err(AttendanceServiceError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}
