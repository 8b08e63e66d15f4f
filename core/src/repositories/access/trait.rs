//! Role and permission repository traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{NewPermission, NewRole, Permission, Role, RolePermission, UserRole};
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolePermissionFilter {
    pub role_id: Option<i64>,
    pub permission_id: Option<i64>,
}

impl RolePermissionFilter {
    pub fn matches(&self, grant: &RolePermission) -> bool {
        self.role_id.map_or(true, |r| grant.role_id == r)
            && self.permission_id.map_or(true, |p| grant.permission_id == p)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserRoleFilter {
    pub user_id: Option<Uuid>,
    pub role_id: Option<i64>,
}

impl UserRoleFilter {
    pub fn matches(&self, assignment: &UserRole) -> bool {
        self.user_id.map_or(true, |u| assignment.user_id == u)
            && self.role_id.map_or(true, |r| assignment.role_id == r)
    }
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// A taken name yields `ValidationError::DuplicateValue { field: "name" }`
    async fn create(&self, role: NewRole) -> Result<Role, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, DomainError>;

    async fn update(&self, role: Role) -> Result<Role, DomainError>;

    /// Delete a role with its permission grants and user assignments
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List roles ordered by name
    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<Role>, DomainError>;
}

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Both `name` and `codename` are unique
    async fn create(&self, permission: NewPermission) -> Result<Permission, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>, DomainError>;

    async fn update(&self, permission: Permission) -> Result<Permission, DomainError>;

    /// Delete a permission and every grant of it
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List permissions ordered by name
    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<Permission>, DomainError>;
}

#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    /// Grant a permission to a role. A pair that already exists yields
    /// `ValidationError::DuplicateValue { field: "permission" }`.
    async fn create(
        &self,
        role_id: i64,
        permission_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RolePermission, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<RolePermission>, DomainError>;

    async fn update(&self, grant: RolePermission) -> Result<RolePermission, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List grants in insertion order
    async fn list(
        &self,
        filter: &RolePermissionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<RolePermission>, DomainError>;
}

#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Assign a role to a user. A pair that already exists yields
    /// `ValidationError::DuplicateValue { field: "role" }`.
    async fn create(
        &self,
        user_id: Uuid,
        role_id: i64,
        now: DateTime<Utc>,
    ) -> Result<UserRole, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRole>, DomainError>;

    async fn update(&self, assignment: UserRole) -> Result<UserRole, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List assignments in insertion order
    async fn list(
        &self,
        filter: &UserRoleFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<UserRole>, DomainError>;
}
