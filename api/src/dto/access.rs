use sefr_core::repositories::{RolePermissionFilter, UserRoleFilter};
use sefr_core::value_objects::{
    PermissionChanges, PermissionInput, RoleChanges, RoleInput, RolePermissionChanges,
    UserRoleChanges,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl From<RoleRequest> for RoleInput {
    fn from(request: RoleRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RolePatchRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<RolePatchRequest> for RoleChanges {
    fn from(request: RolePatchRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PermissionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub codename: String,
    #[serde(default)]
    pub description: String,
}

impl From<PermissionRequest> for PermissionInput {
    fn from(request: PermissionRequest) -> Self {
        Self {
            name: request.name,
            codename: request.codename,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PermissionPatchRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub codename: Option<String>,
    pub description: Option<String>,
}

impl From<PermissionPatchRequest> for PermissionChanges {
    fn from(request: PermissionPatchRequest) -> Self {
        Self {
            name: request.name,
            codename: request.codename,
            description: request.description,
        }
    }
}

/// Body of POST and PUT on `/role-permissions/`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RolePermissionRequest {
    #[serde(alias = "role_id")]
    pub role: i64,
    #[serde(alias = "permission_id")]
    pub permission: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RolePermissionPatchRequest {
    #[serde(alias = "role_id")]
    pub role: Option<i64>,
    #[serde(alias = "permission_id")]
    pub permission: Option<i64>,
}

impl From<RolePermissionRequest> for RolePermissionChanges {
    fn from(request: RolePermissionRequest) -> Self {
        Self {
            role_id: Some(request.role),
            permission_id: Some(request.permission),
        }
    }
}

impl From<RolePermissionPatchRequest> for RolePermissionChanges {
    fn from(request: RolePermissionPatchRequest) -> Self {
        Self {
            role_id: request.role,
            permission_id: request.permission,
        }
    }
}

/// Body of POST and PUT on `/user-roles/`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserRoleRequest {
    #[serde(alias = "user_id")]
    pub user: Uuid,
    #[serde(alias = "role_id")]
    pub role: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UserRolePatchRequest {
    #[serde(alias = "user_id")]
    pub user: Option<Uuid>,
    #[serde(alias = "role_id")]
    pub role: Option<i64>,
}

impl From<UserRoleRequest> for UserRoleChanges {
    fn from(request: UserRoleRequest) -> Self {
        Self {
            user_id: Some(request.user),
            role_id: Some(request.role),
        }
    }
}

impl From<UserRolePatchRequest> for UserRoleChanges {
    fn from(request: UserRolePatchRequest) -> Self {
        Self {
            user_id: request.user,
            role_id: request.role,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePermissionListQuery {
    pub role: Option<i64>,
    pub permission: Option<i64>,
}

impl From<RolePermissionListQuery> for RolePermissionFilter {
    fn from(query: RolePermissionListQuery) -> Self {
        Self {
            role_id: query.role,
            permission_id: query.permission,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRoleListQuery {
    pub user: Option<Uuid>,
    pub role: Option<i64>,
}

impl From<UserRoleListQuery> for UserRoleFilter {
    fn from(query: UserRoleListQuery) -> Self {
        Self {
            user_id: query.user,
            role_id: query.role,
        }
    }
}
