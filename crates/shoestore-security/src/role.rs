// ============================================================================
// Shoe Store Security - Roles & Role Gate
// File: crates/shoestore-security/src/role.rs
// ============================================================================
//! Roles, the authenticated identity, and the allow/deny table used by route gates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Account role. Stored as `users.roleid` (1 = admin, 2 = manager, 3 = user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    /// Unknown ids degrade to the least privileged role.
    pub fn from_role_id(id: i32) -> Self {
        match id {
            1 => Role::Admin,
            2 => Role::Manager,
            _ => Role::User,
        }
    }

    pub fn role_id(&self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::Manager => 2,
            Role::User => 3,
        }
    }

    /// Admin passes every gate. Manager and user are sibling capabilities:
    /// each passes only its own gate.
    pub fn permits(&self, required: Role) -> bool {
        matches!(
            (self, required),
            (Role::Admin, _) | (Role::Manager, Role::Manager) | (Role::User, Role::User)
        )
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            other => Err(AuthError::Invalid(format!("unknown role: {}", other))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity proven by a validated session token. Immutable for the life of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn authorize(&self, required: Role) -> Result<(), AuthError> {
        if self.role.permits(required) {
            Ok(())
        } else {
            Err(AuthError::Denied { actor: self.role, required })
        }
    }

    /// Self-service data belongs to its owner. Admins may act on anyone's behalf.
    pub fn acts_for(&self, user_id: i32) -> bool {
        self.role == Role::Admin || self.user_id == user_id
    }
}
