//! Staff roles.
//!
//! Role names are stored as upper-case text in `staff.role` and must match
//! the `ck_staff_role` check constraint in the initial migration.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MANAGER: &str = "MANAGER";
pub const ROLE_STYLIST: &str = "STYLIST";
pub const ROLE_ASSISTANT: &str = "ASSISTANT";
pub const ROLE_RECEPTIONIST: &str = "RECEPTIONIST";

/// Every role accepted by the staff table.
pub const ALL_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_MANAGER,
    ROLE_STYLIST,
    ROLE_ASSISTANT,
    ROLE_RECEPTIONIST,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    Manager,
    Stylist,
    Assistant,
    Receptionist,
}

impl StaffRole {
    /// Parse a stored role name. Matching is case-insensitive; unknown names
    /// yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_MANAGER => Some(Self::Manager),
            ROLE_STYLIST => Some(Self::Stylist),
            ROLE_ASSISTANT => Some(Self::Assistant),
            ROLE_RECEPTIONIST => Some(Self::Receptionist),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Manager => ROLE_MANAGER,
            Self::Stylist => ROLE_STYLIST,
            Self::Assistant => ROLE_ASSISTANT,
            Self::Receptionist => ROLE_RECEPTIONIST,
        }
    }

    /// Managers and admins may authorize voids and manage staff records.
    pub fn is_manager(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

/// Returns `true` if the stored role name belongs to a manager or admin.
pub fn is_manager_role(role: &str) -> bool {
    StaffRole::parse(role).is_some_and(StaffRole::is_manager)
}
