//! Account domain entities: system-wide users and location-bound staff.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_CLIENT, ROLE_LOCAL_USER};

/// Roles for system-wide accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    /// Staff account scoped to exactly one location
    #[serde(rename = "local_user")]
    LocalUser,
}

impl Role {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Client => ROLE_CLIENT,
            Role::LocalUser => ROLE_LOCAL_USER,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => Role::Admin,
            ROLE_LOCAL_USER => Role::LocalUser,
            _ => Role::Client,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System-wide account (administrator or citizen-facing client).
///
/// Never carries a location affiliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Staff account bound to exactly one location for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub location_id: Uuid,
}

/// Tagged variant over the two account families sharing the login path.
#[derive(Debug, Clone)]
pub enum Account {
    User(User),
    Staff(StaffUser),
}

impl Account {
    pub fn id(&self) -> Uuid {
        match self {
            Account::User(u) => u.id,
            Account::Staff(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Account::User(u) => &u.name,
            Account::Staff(s) => &s.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::User(u) => &u.email,
            Account::Staff(s) => &s.email,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Account::User(u) => &u.password_hash,
            Account::Staff(s) => &s.password_hash,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Account::User(u) => u.role,
            Account::Staff(_) => Role::LocalUser,
        }
    }

    /// Location binding, present only for staff accounts.
    pub fn location_id(&self) -> Option<Uuid> {
        match self {
            Account::User(_) => None,
            Account::Staff(s) => Some(s.location_id),
        }
    }
}

/// Admin contact projection used for notification fan-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminContact {
    pub name: String,
    pub email: String,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// Email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account role
    #[schema(example = "client")]
    pub role: String,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        }
    }
}

impl From<StaffUser> for AccountResponse {
    fn from(staff: StaffUser) -> Self {
        Self {
            id: staff.id,
            name: staff.name,
            email: staff.email,
            role: Role::LocalUser.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("local_user"), Role::LocalUser);
        assert_eq!(Role::from("client"), Role::Client);
        // Unknown strings degrade to the least privileged role
        assert_eq!(Role::from("superuser"), Role::Client);
    }

    #[test]
    fn test_account_surface() {
        let staff = StaffUser {
            id: Uuid::new_v4(),
            name: "Staff".into(),
            email: "staff@example.com".into(),
            password_hash: "hash".into(),
            location_id: Uuid::new_v4(),
        };
        let account = Account::Staff(staff.clone());

        assert_eq!(account.role(), Role::LocalUser);
        assert_eq!(account.location_id(), Some(staff.location_id));
        assert_eq!(account.email(), "staff@example.com");
    }
}
