use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{NewPermission, NewRole, Permission, Role, RolePermission, UserRole};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::memory_store::{MemoryStore, Tables};

use super::trait_::{
    PermissionRepository, RolePermissionFilter, RolePermissionRepository, RoleRepository,
    UserRoleFilter, UserRoleRepository,
};

fn duplicate(field: &str) -> DomainError {
    ValidationError::DuplicateValue { field: field.into() }.into()
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn check_role_name(tables: &Tables, id: i64, name: &str) -> Result<(), DomainError> {
    if tables.roles.values().any(|r| r.id != id && r.name == name) {
        return Err(duplicate("name"));
    }
    Ok(())
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create(&self, role: NewRole) -> Result<Role, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        check_role_name(&tables, 0, &role.name)?;
        let id = tables.next_id();
        let role = role.into_role(id);
        tables.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.roles.get(&id).cloned())
    }

    async fn update(&self, role: Role) -> Result<Role, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.roles.contains_key(&role.id) {
            return Err(DomainError::not_found("Role"));
        }
        check_role_name(&tables, role.id, &role.name)?;
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.cascade_delete_role(id))
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<Role>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(PaginatedResponse::from_vec(roles, pagination))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPermissionRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn check_permission(tables: &Tables, id: i64, name: &str, codename: &str) -> Result<(), DomainError> {
    for other in tables.permissions.values().filter(|p| p.id != id) {
        if other.name == name {
            return Err(duplicate("name"));
        }
        if other.codename == codename {
            return Err(duplicate("codename"));
        }
    }
    Ok(())
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn create(&self, permission: NewPermission) -> Result<Permission, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        check_permission(&tables, 0, &permission.name, &permission.codename)?;
        let id = tables.next_id();
        let permission = permission.into_permission(id);
        tables.permissions.insert(id, permission.clone());
        Ok(permission)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.permissions.get(&id).cloned())
    }

    async fn update(&self, permission: Permission) -> Result<Permission, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.permissions.contains_key(&permission.id) {
            return Err(DomainError::not_found("Permission"));
        }
        check_permission(&tables, permission.id, &permission.name, &permission.codename)?;
        tables.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.cascade_delete_permission(id))
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<Permission>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut permissions: Vec<Permission> = tables.permissions.values().cloned().collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(PaginatedResponse::from_vec(permissions, pagination))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRolePermissionRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryRolePermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn check_grant(tables: &Tables, id: i64, role_id: i64, permission_id: i64) -> Result<(), DomainError> {
    if !tables.roles.contains_key(&role_id) {
        return Err(DomainError::not_found("Role"));
    }
    if !tables.permissions.contains_key(&permission_id) {
        return Err(DomainError::not_found("Permission"));
    }
    let taken = tables
        .role_permissions
        .values()
        .any(|g| g.id != id && g.role_id == role_id && g.permission_id == permission_id);
    if taken {
        return Err(duplicate("permission"));
    }
    Ok(())
}

#[async_trait]
impl RolePermissionRepository for InMemoryRolePermissionRepository {
    async fn create(
        &self,
        role_id: i64,
        permission_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RolePermission, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        check_grant(&tables, 0, role_id, permission_id)?;
        let id = tables.next_id();
        let grant = RolePermission {
            id,
            role_id,
            permission_id,
            created_at: now,
        };
        tables.role_permissions.insert(id, grant.clone());
        Ok(grant)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RolePermission>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.role_permissions.get(&id).cloned())
    }

    async fn update(&self, grant: RolePermission) -> Result<RolePermission, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.role_permissions.contains_key(&grant.id) {
            return Err(DomainError::not_found("RolePermission"));
        }
        check_grant(&tables, grant.id, grant.role_id, grant.permission_id)?;
        tables.role_permissions.insert(grant.id, grant.clone());
        Ok(grant)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.role_permissions.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: &RolePermissionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<RolePermission>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut grants: Vec<RolePermission> = tables
            .role_permissions
            .values()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect();
        grants.sort_by_key(|g| g.id);
        Ok(PaginatedResponse::from_vec(grants, pagination))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRoleRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn check_assignment(tables: &Tables, id: i64, user_id: Uuid, role_id: i64) -> Result<(), DomainError> {
    if !tables.users.contains_key(&user_id) {
        return Err(DomainError::not_found("User"));
    }
    if !tables.roles.contains_key(&role_id) {
        return Err(DomainError::not_found("Role"));
    }
    let taken = tables
        .user_roles
        .values()
        .any(|a| a.id != id && a.user_id == user_id && a.role_id == role_id);
    if taken {
        return Err(duplicate("role"));
    }
    Ok(())
}

#[async_trait]
impl UserRoleRepository for InMemoryUserRoleRepository {
    async fn create(
        &self,
        user_id: Uuid,
        role_id: i64,
        now: DateTime<Utc>,
    ) -> Result<UserRole, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        check_assignment(&tables, 0, user_id, role_id)?;
        let id = tables.next_id();
        let assignment = UserRole {
            id,
            user_id,
            role_id,
            created_at: now,
        };
        tables.user_roles.insert(id, assignment.clone());
        Ok(assignment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRole>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.user_roles.get(&id).cloned())
    }

    async fn update(&self, assignment: UserRole) -> Result<UserRole, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.user_roles.contains_key(&assignment.id) {
            return Err(DomainError::not_found("UserRole"));
        }
        check_assignment(&tables, assignment.id, assignment.user_id, assignment.role_id)?;
        tables.user_roles.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.user_roles.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: &UserRoleFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<UserRole>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut assignments: Vec<UserRole> = tables
            .user_roles
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.id);
        Ok(PaginatedResponse::from_vec(assignments, pagination))
    }
}
