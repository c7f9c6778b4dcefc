//! Account role types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum length of a student registration number.
pub const REGISTRATION_NUMBER_MAX_LEN: usize = 20;

/// Role discriminant as it appears on the wire and in storage.
///
/// Wire format: lowercase string (`"faculty"`, `"student"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Faculty,
    Student,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Faculty => "faculty",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faculty" => Ok(Self::Faculty),
            "student" => Ok(Self::Student),
            other => Err(RoleError::Unknown(other.to_owned())),
        }
    }
}

/// Errors raised while assembling a [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    #[error("unknown role: {0}")]
    Unknown(String),
    #[error("registration number is required for students")]
    MissingRegistrationNumber,
    #[error("registration number must be at most {REGISTRATION_NUMBER_MAX_LEN} characters")]
    RegistrationNumberTooLong,
}

/// A profile role together with the fields that only make sense for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Faculty,
    Student { registration_number: String },
}

impl Role {
    /// Build a role from its stored/wire parts.
    ///
    /// Students need a non-blank registration number; for faculty any
    /// supplied number is dropped.
    pub fn from_parts(kind: RoleKind, registration_number: Option<&str>) -> Result<Self, RoleError> {
        match kind {
            RoleKind::Faculty => Ok(Self::Faculty),
            RoleKind::Student => {
                let number = registration_number
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or(RoleError::MissingRegistrationNumber)?;
                if number.chars().count() > REGISTRATION_NUMBER_MAX_LEN {
                    return Err(RoleError::RegistrationNumberTooLong);
                }
                Ok(Self::Student {
                    registration_number: number.to_owned(),
                })
            }
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Faculty => RoleKind::Faculty,
            Self::Student { .. } => RoleKind::Student,
        }
    }

    pub fn is_faculty(&self) -> bool {
        matches!(self, Self::Faculty)
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Self::Student { .. })
    }

    pub fn registration_number(&self) -> Option<&str> {
        match self {
            Self::Faculty => None,
            Self::Student {
                registration_number,
            } => Some(registration_number),
        }
    }
}
