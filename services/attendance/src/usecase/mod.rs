pub mod account;
pub mod attendance;
pub mod class;
pub mod code;
pub mod dashboard;

#[cfg(test)]
pub(crate) mod mocks;

use campus_domain::id::{AccountId, ClassId};

use crate::domain::repository::{AccountRepository, ClassRepository};
use crate::domain::types::{MakeUpClass, Profile};
use crate::error::AttendanceServiceError;

// ── Role gates ───────────────────────────────────────────────────────────────
//
// Roles come from the stored profile. A caller without a profile is treated
// like one holding the wrong role.

pub(crate) async fn require_profile<A: AccountRepository>(
    accounts: &A,
    actor: AccountId,
) -> Result<Profile, AttendanceServiceError> {
    accounts
        .find_profile(actor)
        .await?
        .ok_or(AttendanceServiceError::Forbidden)
}

pub(crate) async fn require_faculty<A: AccountRepository>(
    accounts: &A,
    actor: AccountId,
) -> Result<Profile, AttendanceServiceError> {
    let profile = require_profile(accounts, actor).await?;
    if !profile.is_faculty() {
        return Err(AttendanceServiceError::Forbidden);
    }
    Ok(profile)
}

pub(crate) async fn require_student<A: AccountRepository>(
    accounts: &A,
    actor: AccountId,
) -> Result<Profile, AttendanceServiceError> {
    let profile = require_profile(accounts, actor).await?;
    if !profile.is_student() {
        return Err(AttendanceServiceError::Forbidden);
    }
    Ok(profile)
}

/// Faculty-only, and the class must belong to `actor`.
pub(crate) async fn require_owned_class<A, C>(
    accounts: &A,
    classes: &C,
    actor: AccountId,
    class_id: ClassId,
) -> Result<MakeUpClass, AttendanceServiceError>
where
    A: AccountRepository,
    C: ClassRepository,
{
    require_faculty(accounts, actor).await?;
    let class = classes
        .find_by_id(class_id)
        .await?
        .ok_or(AttendanceServiceError::ClassNotFound)?;
    if !class.is_owned_by(actor) {
        return Err(AttendanceServiceError::Forbidden);
    }
    Ok(class)
}
