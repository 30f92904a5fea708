//! Actions checked by the RBAC resolver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Privilege class of an action. Ordered: Read < Write < Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionClass {
    /// Observing content.
    Read,
    /// Changing content.
    Write,
    /// Changing who may do what.
    Admin,
}

/// An operation a principal may attempt on a space or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "acl_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Enumerate children.
    List,
    /// View content.
    Read,
    /// Create or modify content.
    Write,
    /// Remove content.
    Delete,
    /// Change permissions and settings.
    Manage,
}

impl Action {
    /// Return the privilege class of this action.
    pub fn class(&self) -> ActionClass {
        match self {
            Self::List | Self::Read => ActionClass::Read,
            Self::Write | Self::Delete => ActionClass::Write,
            Self::Manage => ActionClass::Admin,
        }
    }

    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = docspace_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(Self::List),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            "manage" => Ok(Self::Manage),
            _ => Err(docspace_core::AppError::invalid_input(format!(
                "Invalid action: '{s}'. Expected one of: list, read, write, delete, manage"
            ))),
        }
    }
}
