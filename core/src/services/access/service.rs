use std::sync::Arc;

use sefr_shared::types::{PaginatedResponse, Pagination};
use sefr_shared::validation::char_length_between;
use uuid::Uuid;

use crate::domain::entities::{NewPermission, NewRole, Permission, Role, RolePermission, User, UserRole};
use crate::domain::value_objects::{
    PermissionChanges, PermissionInput, RoleChanges, RoleInput, RolePermissionChanges,
    UserRoleChanges,
};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{
    PermissionRepository, RolePermissionFilter, RolePermissionRepository, RoleRepository,
    UserRepository, UserRoleFilter, UserRoleRepository,
};
use crate::services::clock::Clock;

const ROLE_NAME_MAX: usize = 50;
const PERMISSION_NAME_MAX: usize = 100;

pub struct AccessService {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    grants: Arc<dyn RolePermissionRepository>,
    assignments: Arc<dyn UserRoleRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl AccessService {
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        grants: Arc<dyn RolePermissionRepository>,
        assignments: Arc<dyn UserRoleRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            roles,
            permissions,
            grants,
            assignments,
            users,
            clock,
        }
    }

    // Roles

    pub async fn list_roles(&self, pagination: Pagination) -> DomainResult<PaginatedResponse<Role>> {
        self.roles.list(pagination.normalized()).await
    }

    pub async fn get_role(&self, id: i64) -> DomainResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Role"))
    }

    pub async fn create_role(&self, actor: &User, input: RoleInput) -> DomainResult<Role> {
        ensure_staff(actor)?;
        let role = self
            .roles
            .create(NewRole {
                name: bounded("name", &input.name, ROLE_NAME_MAX)?,
                description: input.description.trim().to_string(),
                now: self.clock.now(),
            })
            .await?;
        tracing::info!(role_id = role.id, name = %role.name, actor_id = %actor.id, "Role created");
        Ok(role)
    }

    pub async fn update_role(&self, actor: &User, id: i64, changes: RoleChanges) -> DomainResult<Role> {
        ensure_staff(actor)?;
        let mut role = self.get_role(id).await?;
        if let Some(name) = changes.name {
            role.name = bounded("name", &name, ROLE_NAME_MAX)?;
        }
        if let Some(description) = changes.description {
            role.description = description.trim().to_string();
        }
        role.updated_at = self.clock.now();
        self.roles.update(role).await
    }

    /// Delete a role; its grants and assignments go with it
    pub async fn delete_role(&self, actor: &User, id: i64) -> DomainResult<()> {
        ensure_staff(actor)?;
        if !self.roles.delete(id).await? {
            return Err(DomainError::not_found("Role"));
        }
        tracing::info!(role_id = id, actor_id = %actor.id, "Role deleted");
        Ok(())
    }

    // Permissions

    pub async fn list_permissions(
        &self,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Permission>> {
        self.permissions.list(pagination.normalized()).await
    }

    pub async fn get_permission(&self, id: i64) -> DomainResult<Permission> {
        self.permissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Permission"))
    }

    pub async fn create_permission(&self, actor: &User, input: PermissionInput) -> DomainResult<Permission> {
        ensure_staff(actor)?;
        let permission = self
            .permissions
            .create(NewPermission {
                name: bounded("name", &input.name, PERMISSION_NAME_MAX)?,
                codename: codename(&input.codename)?,
                description: input.description.trim().to_string(),
                now: self.clock.now(),
            })
            .await?;
        tracing::info!(
            permission_id = permission.id,
            codename = %permission.codename,
            actor_id = %actor.id,
            "Permission created"
        );
        Ok(permission)
    }

    pub async fn update_permission(
        &self,
        actor: &User,
        id: i64,
        changes: PermissionChanges,
    ) -> DomainResult<Permission> {
        ensure_staff(actor)?;
        let mut permission = self.get_permission(id).await?;
        if let Some(name) = changes.name {
            permission.name = bounded("name", &name, PERMISSION_NAME_MAX)?;
        }
        if let Some(value) = changes.codename {
            permission.codename = codename(&value)?;
        }
        if let Some(description) = changes.description {
            permission.description = description.trim().to_string();
        }
        self.permissions.update(permission).await
    }

    pub async fn delete_permission(&self, actor: &User, id: i64) -> DomainResult<()> {
        ensure_staff(actor)?;
        if !self.permissions.delete(id).await? {
            return Err(DomainError::not_found("Permission"));
        }
        Ok(())
    }

    // Grants of permissions to roles

    pub async fn list_grants(
        &self,
        filter: &RolePermissionFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<RolePermission>> {
        self.grants.list(filter, pagination.normalized()).await
    }

    pub async fn get_grant(&self, id: i64) -> DomainResult<RolePermission> {
        self.grants
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RolePermission"))
    }

    /// Grant a permission to a role; each pair is granted at most once
    pub async fn grant(&self, actor: &User, role_id: i64, permission_id: i64) -> DomainResult<RolePermission> {
        ensure_staff(actor)?;
        self.ensure_role(role_id).await?;
        self.ensure_permission(permission_id).await?;
        let grant = self.grants.create(role_id, permission_id, self.clock.now()).await?;
        tracing::info!(role_id, permission_id, actor_id = %actor.id, "Permission granted");
        Ok(grant)
    }

    pub async fn update_grant(
        &self,
        actor: &User,
        id: i64,
        changes: RolePermissionChanges,
    ) -> DomainResult<RolePermission> {
        ensure_staff(actor)?;
        let mut grant = self.get_grant(id).await?;
        if let Some(role_id) = changes.role_id {
            self.ensure_role(role_id).await?;
            grant.role_id = role_id;
        }
        if let Some(permission_id) = changes.permission_id {
            self.ensure_permission(permission_id).await?;
            grant.permission_id = permission_id;
        }
        self.grants.update(grant).await
    }

    pub async fn revoke(&self, actor: &User, id: i64) -> DomainResult<()> {
        ensure_staff(actor)?;
        if !self.grants.delete(id).await? {
            return Err(DomainError::not_found("RolePermission"));
        }
        Ok(())
    }

    // Assignments of roles to users

    pub async fn list_assignments(
        &self,
        filter: &UserRoleFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<UserRole>> {
        self.assignments.list(filter, pagination.normalized()).await
    }

    pub async fn get_assignment(&self, id: i64) -> DomainResult<UserRole> {
        self.assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("UserRole"))
    }

    /// Give a user a role; each pair is assigned at most once
    pub async fn assign(&self, actor: &User, user_id: Uuid, role_id: i64) -> DomainResult<UserRole> {
        ensure_staff(actor)?;
        self.ensure_user(user_id).await?;
        self.ensure_role(role_id).await?;
        let assignment = self.assignments.create(user_id, role_id, self.clock.now()).await?;
        tracing::info!(user_id = %user_id, role_id, actor_id = %actor.id, "Role assigned");
        Ok(assignment)
    }

    pub async fn update_assignment(
        &self,
        actor: &User,
        id: i64,
        changes: UserRoleChanges,
    ) -> DomainResult<UserRole> {
        ensure_staff(actor)?;
        let mut assignment = self.get_assignment(id).await?;
        if let Some(user_id) = changes.user_id {
            self.ensure_user(user_id).await?;
            assignment.user_id = user_id;
        }
        if let Some(role_id) = changes.role_id {
            self.ensure_role(role_id).await?;
            assignment.role_id = role_id;
        }
        self.assignments.update(assignment).await
    }

    pub async fn unassign(&self, actor: &User, id: i64) -> DomainResult<()> {
        ensure_staff(actor)?;
        if !self.assignments.delete(id).await? {
            return Err(DomainError::not_found("UserRole"));
        }
        Ok(())
    }

    async fn ensure_role(&self, id: i64) -> DomainResult<()> {
        match self.roles.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation {
                message: format!("Role {} does not exist", id),
            }),
        }
    }

    async fn ensure_permission(&self, id: i64) -> DomainResult<()> {
        match self.permissions.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation {
                message: format!("Permission {} does not exist", id),
            }),
        }
    }

    async fn ensure_user(&self, id: Uuid) -> DomainResult<()> {
        match self.users.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation {
                message: format!("User {} does not exist", id),
            }),
        }
    }
}

fn ensure_staff(actor: &User) -> DomainResult<()> {
    if actor.is_staff {
        return Ok(());
    }
    tracing::warn!(user_id = %actor.id, event = "permission_denied", "Non-staff user tried to change roles");
    Err(DomainError::forbidden("Only staff may manage roles and permissions"))
}

fn bounded(field: &str, value: &str, max: usize) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field).into());
    }
    if !char_length_between(value, 1, max) {
        return Err(ValidationError::InvalidLength {
            field: field.to_string(),
            min: 1,
            max,
            actual: value.chars().count(),
        }
        .into());
    }
    Ok(value.to_string())
}

fn codename(value: &str) -> DomainResult<String> {
    let value = bounded("codename", value, PERMISSION_NAME_MAX)?;
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: String::from("codename"),
        }
        .into());
    }
    Ok(value)
}
