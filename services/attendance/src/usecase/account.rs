use tracing::info;

use campus_domain::id::AccountId;
use campus_domain::role::{Role, RoleError, RoleKind};

use crate::domain::repository::{AccountRepository, Clock};
use crate::domain::types::{
    Account, AccountUpdate, DEPARTMENT_MAX_LEN, NAME_MAX_LEN, Profile, USERNAME_MAX_LEN, max_len,
    required,
};
use crate::error::AttendanceServiceError;

fn validate_username(username: &str) -> Result<(), AttendanceServiceError> {
    required("username", username, USERNAME_MAX_LEN)?;
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(AttendanceServiceError::validation(
            "username",
            "may contain only letters, digits and @/./+/-/_",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AttendanceServiceError> {
    required("email", email, 254)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AttendanceServiceError::validation(
            "email",
            "enter a valid email address",
        )),
    }
}

/// Blank departments are stored as absent.
fn normalize_department(department: Option<String>) -> Result<Option<String>, AttendanceServiceError> {
    let department = department
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty());
    if let Some(ref d) = department {
        max_len("department", d, DEPARTMENT_MAX_LEN)?;
    }
    Ok(department)
}

fn role_error(e: RoleError) -> AttendanceServiceError {
    let field = match e {
        RoleError::Unknown(_) => "role",
        RoleError::MissingRegistrationNumber | RoleError::RegistrationNumberTooLong => {
            "registration_number"
        }
    };
    AttendanceServiceError::validation(field, e.to_string())
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: RoleKind,
    pub registration_number: Option<String>,
    pub department: Option<String>,
}

pub struct RegisterUseCase<A: AccountRepository, K: Clock> {
    pub accounts: A,
    pub clock: K,
}

impl<A: AccountRepository, K: Clock> RegisterUseCase<A, K> {
    pub async fn execute(
        &self,
        input: RegisterInput,
    ) -> Result<(Account, Profile), AttendanceServiceError> {
        let username = input.username.trim().to_owned();
        let first_name = input.first_name.trim().to_owned();
        let last_name = input.last_name.trim().to_owned();
        let email = input.email.trim().to_owned();

        validate_username(&username)?;
        required("first_name", &first_name, NAME_MAX_LEN)?;
        required("last_name", &last_name, NAME_MAX_LEN)?;
        validate_email(&email)?;
        let department = normalize_department(input.department)?;
        let role = Role::from_parts(input.role, input.registration_number.as_deref())
            .map_err(role_error)?;

        let account = Account {
            id: AccountId::generate(),
            username,
            first_name,
            last_name,
            email,
            created_at: self.clock.now(),
        };
        let profile = Profile {
            account_id: account.id,
            role,
            department,
        };
        if !self.accounts.create(&account, &profile).await? {
            return Err(AttendanceServiceError::AccountAlreadyExists);
        }
        info!(account_id = %account.id, role = %profile.role.kind(), "account registered");
        Ok((account, profile))
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> GetMeUseCase<A> {
    pub async fn execute(
        &self,
        actor: AccountId,
    ) -> Result<(Account, Profile), AttendanceServiceError> {
        self.accounts
            .find(actor)
            .await?
            .ok_or(AttendanceServiceError::AccountNotFound)
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

/// Role and registration number are immutable and not accepted here.
/// An empty `department` clears it.
pub struct UpdateMeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

pub struct UpdateMeUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> UpdateMeUseCase<A> {
    pub async fn execute(
        &self,
        actor: AccountId,
        input: UpdateMeInput,
    ) -> Result<(Account, Profile), AttendanceServiceError> {
        let update = AccountUpdate {
            first_name: input.first_name.map(|s| s.trim().to_owned()),
            last_name: input.last_name.map(|s| s.trim().to_owned()),
            email: input.email.map(|s| s.trim().to_owned()),
            department: input
                .department
                .map(|d| normalize_department(Some(d)))
                .transpose()?,
        };
        if update.is_empty() {
            return Err(AttendanceServiceError::validation(
                "body",
                "at least one field must be provided",
            ));
        }
        if let Some(ref first_name) = update.first_name {
            required("first_name", first_name, NAME_MAX_LEN)?;
        }
        if let Some(ref last_name) = update.last_name {
            required("last_name", last_name, NAME_MAX_LEN)?;
        }
        if let Some(ref email) = update.email {
            validate_email(email)?;
        }

        if self.accounts.find_profile(actor).await?.is_none() {
            return Err(AttendanceServiceError::AccountNotFound);
        }
        self.accounts.update(actor, &update).await?;
        self.accounts
            .find(actor)
            .await?
            .ok_or(AttendanceServiceError::AccountNotFound)
    }
}
