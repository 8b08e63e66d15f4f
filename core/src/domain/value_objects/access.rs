//! Inputs of the role and permission service.
//!
//! `*Input` carries every field and is used on create and full replace;
//! `*Changes` is a partial update where `None` keeps the stored value.

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleInput {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<RoleInput> for RoleChanges {
    fn from(input: RoleInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionInput {
    pub name: String,
    pub codename: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionChanges {
    pub name: Option<String>,
    pub codename: Option<String>,
    pub description: Option<String>,
}

impl From<PermissionInput> for PermissionChanges {
    fn from(input: PermissionInput) -> Self {
        Self {
            name: Some(input.name),
            codename: Some(input.codename),
            description: Some(input.description),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolePermissionChanges {
    pub role_id: Option<i64>,
    pub permission_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserRoleChanges {
    pub user_id: Option<Uuid>,
    pub role_id: Option<i64>,
}
