//! MySQL implementations of the role and permission repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sefr_core::domain::entities::{NewPermission, NewRole, Permission, Role, RolePermission, UserRole};
use sefr_core::errors::{DomainError, ValidationError};
use sefr_core::repositories::{
    PermissionRepository, RolePermissionFilter, RolePermissionRepository, RoleRepository,
    UserRoleFilter, UserRoleRepository,
};
use sefr_shared::types::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use super::{column, count_column, db_error, duplicate_key, uuid_column};

const ROLE_COLUMNS: &str = "id, name, description, created_at, updated_at";
const PERMISSION_COLUMNS: &str = "id, name, codename, description, created_at";
const GRANT_COLUMNS: &str = "id, role_id, permission_id, created_at";
const ASSIGNMENT_COLUMNS: &str = "id, user_id, role_id, created_at";

fn conflict(context: &str, error: sqlx::Error) -> DomainError {
    match duplicate_key(&error) {
        Some(field) => ValidationError::DuplicateValue { field }.into(),
        None => db_error(context, error),
    }
}

pub struct MySqlRoleRepository {
    pool: MySqlPool,
}

impl MySqlRoleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_role(row: &MySqlRow) -> Result<Role, DomainError> {
        Ok(Role {
            id: column(row, "id")?,
            name: column(row, "name")?,
            description: column(row, "description")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl RoleRepository for MySqlRoleRepository {
    async fn create(&self, role: NewRole) -> Result<Role, DomainError> {
        let result = sqlx::query(
            "INSERT INTO roles (name, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.now)
        .bind(role.now)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict("create role", e))?;

        Ok(role.into_role(result.last_insert_id() as i64))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, DomainError> {
        let query = format!("SELECT {} FROM roles WHERE id = ?", ROLE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find role", e))?;

        row.as_ref().map(Self::row_to_role).transpose()
    }

    async fn update(&self, role: Role) -> Result<Role, DomainError> {
        let result = sqlx::query("UPDATE roles SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&role.name)
            .bind(&role.description)
            .bind(role.updated_at)
            .bind(role.id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict("update role", e))?;

        if result.rows_affected() == 0 && self.find_by_id(role.id).await?.is_none() {
            return Err(DomainError::not_found("Role"));
        }
        Ok(role)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        // Grants and assignments go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<Role>, DomainError> {
        let pagination = pagination.normalized();
        let count = sqlx::query("SELECT COUNT(*) AS count FROM roles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count roles", e))?;

        let query = format!("SELECT {} FROM roles ORDER BY name LIMIT ? OFFSET ?", ROLE_COLUMNS);
        let rows = sqlx::query(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list roles", e))?;

        let roles = rows.iter().map(Self::row_to_role).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(roles, pagination, count_column(&count)?))
    }
}

pub struct MySqlPermissionRepository {
    pool: MySqlPool,
}

impl MySqlPermissionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_permission(row: &MySqlRow) -> Result<Permission, DomainError> {
        Ok(Permission {
            id: column(row, "id")?,
            name: column(row, "name")?,
            codename: column(row, "codename")?,
            description: column(row, "description")?,
            created_at: column(row, "created_at")?,
        })
    }
}

#[async_trait]
impl PermissionRepository for MySqlPermissionRepository {
    async fn create(&self, permission: NewPermission) -> Result<Permission, DomainError> {
        let result = sqlx::query(
            "INSERT INTO permissions (name, codename, description, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&permission.name)
        .bind(&permission.codename)
        .bind(&permission.description)
        .bind(permission.now)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict("create permission", e))?;

        Ok(permission.into_permission(result.last_insert_id() as i64))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>, DomainError> {
        let query = format!("SELECT {} FROM permissions WHERE id = ?", PERMISSION_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find permission", e))?;

        row.as_ref().map(Self::row_to_permission).transpose()
    }

    async fn update(&self, permission: Permission) -> Result<Permission, DomainError> {
        let result = sqlx::query("UPDATE permissions SET name = ?, codename = ?, description = ? WHERE id = ?")
            .bind(&permission.name)
            .bind(&permission.codename)
            .bind(&permission.description)
            .bind(permission.id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict("update permission", e))?;

        if result.rows_affected() == 0 && self.find_by_id(permission.id).await?.is_none() {
            return Err(DomainError::not_found("Permission"));
        }
        Ok(permission)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete permission", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<Permission>, DomainError> {
        let pagination = pagination.normalized();
        let count = sqlx::query("SELECT COUNT(*) AS count FROM permissions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count permissions", e))?;

        let query = format!(
            "SELECT {} FROM permissions ORDER BY name LIMIT ? OFFSET ?",
            PERMISSION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list permissions", e))?;

        let permissions = rows.iter().map(Self::row_to_permission).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(permissions, pagination, count_column(&count)?))
    }
}

pub struct MySqlRolePermissionRepository {
    pool: MySqlPool,
}

impl MySqlRolePermissionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_grant(row: &MySqlRow) -> Result<RolePermission, DomainError> {
        Ok(RolePermission {
            id: column(row, "id")?,
            role_id: column(row, "role_id")?,
            permission_id: column(row, "permission_id")?,
            created_at: column(row, "created_at")?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &RolePermissionFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(role_id) = filter.role_id {
            builder.push(" AND role_id = ").push_bind(role_id);
        }
        if let Some(permission_id) = filter.permission_id {
            builder.push(" AND permission_id = ").push_bind(permission_id);
        }
    }
}

#[async_trait]
impl RolePermissionRepository for MySqlRolePermissionRepository {
    async fn create(
        &self,
        role_id: i64,
        permission_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RolePermission, DomainError> {
        let result = sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(role_id)
        .bind(permission_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict("grant permission", e))?;

        Ok(RolePermission {
            id: result.last_insert_id() as i64,
            role_id,
            permission_id,
            created_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RolePermission>, DomainError> {
        let query = format!("SELECT {} FROM role_permissions WHERE id = ?", GRANT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find role permission", e))?;

        row.as_ref().map(Self::row_to_grant).transpose()
    }

    async fn update(&self, grant: RolePermission) -> Result<RolePermission, DomainError> {
        let result = sqlx::query("UPDATE role_permissions SET role_id = ?, permission_id = ? WHERE id = ?")
            .bind(grant.role_id)
            .bind(grant.permission_id)
            .bind(grant.id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict("update role permission", e))?;

        if result.rows_affected() == 0 && self.find_by_id(grant.id).await?.is_none() {
            return Err(DomainError::not_found("RolePermission"));
        }
        Ok(grant)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM role_permissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("revoke permission", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &RolePermissionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<RolePermission>, DomainError> {
        let pagination = pagination.normalized();

        let mut count: QueryBuilder<'_, MySql> =
            QueryBuilder::new("SELECT COUNT(*) AS count FROM role_permissions");
        Self::push_filter(&mut count, filter);
        let count = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count role permissions", e))?;

        let mut list: QueryBuilder<'_, MySql> =
            QueryBuilder::new(format!("SELECT {} FROM role_permissions", GRANT_COLUMNS));
        Self::push_filter(&mut list, filter);
        list.push(" ORDER BY id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = list
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list role permissions", e))?;

        let grants = rows.iter().map(Self::row_to_grant).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(grants, pagination, count_column(&count)?))
    }
}

pub struct MySqlUserRoleRepository {
    pool: MySqlPool,
}

impl MySqlUserRoleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_assignment(row: &MySqlRow) -> Result<UserRole, DomainError> {
        Ok(UserRole {
            id: column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            role_id: column(row, "role_id")?,
            created_at: column(row, "created_at")?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &UserRoleFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(user_id) = filter.user_id {
            builder.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if let Some(role_id) = filter.role_id {
            builder.push(" AND role_id = ").push_bind(role_id);
        }
    }
}

#[async_trait]
impl UserRoleRepository for MySqlUserRoleRepository {
    async fn create(
        &self,
        user_id: Uuid,
        role_id: i64,
        now: DateTime<Utc>,
    ) -> Result<UserRole, DomainError> {
        let result = sqlx::query("INSERT INTO user_roles (user_id, role_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id.to_string())
            .bind(role_id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict("assign role", e))?;

        Ok(UserRole {
            id: result.last_insert_id() as i64,
            user_id,
            role_id,
            created_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRole>, DomainError> {
        let query = format!("SELECT {} FROM user_roles WHERE id = ?", ASSIGNMENT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user role", e))?;

        row.as_ref().map(Self::row_to_assignment).transpose()
    }

    async fn update(&self, assignment: UserRole) -> Result<UserRole, DomainError> {
        let result = sqlx::query("UPDATE user_roles SET user_id = ?, role_id = ? WHERE id = ?")
            .bind(assignment.user_id.to_string())
            .bind(assignment.role_id)
            .bind(assignment.id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict("update user role", e))?;

        if result.rows_affected() == 0 && self.find_by_id(assignment.id).await?.is_none() {
            return Err(DomainError::not_found("UserRole"));
        }
        Ok(assignment)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("unassign role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &UserRoleFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<UserRole>, DomainError> {
        let pagination = pagination.normalized();

        let mut count: QueryBuilder<'_, MySql> = QueryBuilder::new("SELECT COUNT(*) AS count FROM user_roles");
        Self::push_filter(&mut count, filter);
        let count = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count user roles", e))?;

        let mut list: QueryBuilder<'_, MySql> =
            QueryBuilder::new(format!("SELECT {} FROM user_roles", ASSIGNMENT_COLUMNS));
        Self::push_filter(&mut list, filter);
        list.push(" ORDER BY id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = list
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list user roles", e))?;

        let assignments = rows.iter().map(Self::row_to_assignment).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(assignments, pagination, count_column(&count)?))
    }
}
