//! Group role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::permission::action::ActionClass;

/// Roles a group can carry.
///
/// Ordered by privilege: Admin > User > Guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "group_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    /// Unrestricted access.
    Admin,
    /// Read and write on associated resources.
    User,
    /// Read-only access.
    Guest,
}

impl GroupRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::User => 2,
            Self::Guest => 1,
        }
    }

    /// The most privileged class of action this role can ever perform.
    pub fn ceiling(&self) -> ActionClass {
        match self {
            Self::Admin => ActionClass::Admin,
            Self::User => ActionClass::Write,
            Self::Guest => ActionClass::Read,
        }
    }

    /// Whether the role's ceiling covers `class`.
    pub fn covers(&self, class: ActionClass) -> bool {
        class <= self.ceiling()
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupRole {
    type Err = docspace_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "guest" => Ok(Self::Guest),
            _ => Err(docspace_core::AppError::invalid_input(format!(
                "Invalid group role: '{s}'. Expected one of: admin, user, guest"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceilings() {
        assert!(GroupRole::Admin.covers(ActionClass::Admin));
        assert!(GroupRole::User.covers(ActionClass::Write));
        assert!(!GroupRole::User.covers(ActionClass::Admin));
        assert!(GroupRole::Guest.covers(ActionClass::Read));
        assert!(!GroupRole::Guest.covers(ActionClass::Write));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ADMIN".parse::<GroupRole>().unwrap(), GroupRole::Admin);
        assert_eq!("guest".parse::<GroupRole>().unwrap(), GroupRole::Guest);
        assert!("owner".parse::<GroupRole>().is_err());
    }
}
