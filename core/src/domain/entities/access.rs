//! Roles, permissions and the links between them and users.
//!
//! Names are unique per table, and each link table holds a pair at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    /// Unique, at most 50 characters
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub now: DateTime<Utc>,
}

impl NewRole {
    pub fn into_role(self, id: i64) -> Role {
        Role {
            id,
            name: self.name,
            description: self.description,
            created_at: self.now,
            updated_at: self.now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique machine name, e.g. `articles.publish`
    pub codename: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    pub name: String,
    pub codename: String,
    pub description: String,
    pub now: DateTime<Utc>,
}

impl NewPermission {
    pub fn into_permission(self, id: i64) -> Permission {
        Permission {
            id,
            name: self.name,
            codename: self.codename,
            description: self.description,
            created_at: self.now,
        }
    }
}

/// A permission granted to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub id: i64,
    pub role_id: i64,
    pub permission_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A role held by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: i64,
    pub user_id: Uuid,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
}
