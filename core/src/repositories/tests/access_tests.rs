//! Uniqueness and cascades of the role and permission tables

use std::sync::Arc;

use chrono::Utc;
use sefr_shared::types::Pagination;

use crate::domain::entities::*;
use crate::errors::{DomainError, ValidationError};
use crate::repositories::*;

struct Repos {
    users: InMemoryUserRepository,
    roles: InMemoryRoleRepository,
    permissions: InMemoryPermissionRepository,
    grants: InMemoryRolePermissionRepository,
    assignments: InMemoryUserRoleRepository,
}

fn repos() -> Repos {
    let store = Arc::new(MemoryStore::new());
    Repos {
        users: InMemoryUserRepository::with_store(store.clone()),
        roles: InMemoryRoleRepository::with_store(store.clone()),
        permissions: InMemoryPermissionRepository::with_store(store.clone()),
        grants: InMemoryRolePermissionRepository::with_store(store.clone()),
        assignments: InMemoryUserRoleRepository::with_store(store),
    }
}

fn new_role(name: &str) -> NewRole {
    NewRole {
        name: name.into(),
        description: String::new(),
        now: Utc::now(),
    }
}

fn new_permission(name: &str, codename: &str) -> NewPermission {
    NewPermission {
        name: name.into(),
        codename: codename.into(),
        description: String::new(),
        now: Utc::now(),
    }
}

fn duplicate_field(error: DomainError) -> String {
    match error {
        DomainError::ValidationErr(ValidationError::DuplicateValue { field }) => field,
        other => panic!("expected a duplicate, got {:?}", other),
    }
}

#[tokio::test]
async fn test_role_and_permission_names_are_unique() {
    let r = repos();
    let editor = r.roles.create(new_role("editor")).await.unwrap();
    let err = r.roles.create(new_role("editor")).await.unwrap_err();
    assert_eq!(duplicate_field(err), "name");

    let mut renamed = editor.clone();
    renamed.name = "chief editor".into();
    r.roles.update(renamed).await.unwrap();
    r.roles.create(new_role("editor")).await.unwrap();

    r.permissions.create(new_permission("Publish articles", "articles.publish")).await.unwrap();
    let err = r
        .permissions
        .create(new_permission("Publish articles", "articles.push"))
        .await
        .unwrap_err();
    assert_eq!(duplicate_field(err), "name");
    let err = r
        .permissions
        .create(new_permission("Publish everything", "articles.publish"))
        .await
        .unwrap_err();
    assert_eq!(duplicate_field(err), "codename");

    let names: Vec<String> = r
        .roles
        .list(Pagination::default())
        .await
        .unwrap()
        .results
        .into_iter()
        .map(|role| role.name)
        .collect();
    assert_eq!(names, vec!["chief editor", "editor"]);
}

#[tokio::test]
async fn test_link_pairs_are_unique() {
    let r = repos();
    let now = Utc::now();
    let user = r
        .users
        .create(User::new("sara", "sara@example.com", "S", "A", "hash", now))
        .await
        .unwrap();
    let role = r.roles.create(new_role("editor")).await.unwrap();
    let permission = r.permissions.create(new_permission("Publish", "articles.publish")).await.unwrap();

    r.grants.create(role.id, permission.id, now).await.unwrap();
    let err = r.grants.create(role.id, permission.id, now).await.unwrap_err();
    assert_eq!(duplicate_field(err), "permission");

    r.assignments.create(user.id, role.id, now).await.unwrap();
    let err = r.assignments.create(user.id, role.id, now).await.unwrap_err();
    assert_eq!(duplicate_field(err), "role");

    let err = r.grants.create(role.id, 9999, now).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_deletes_cascade_to_links() {
    let r = repos();
    let now = Utc::now();
    let user = r
        .users
        .create(User::new("sara", "sara@example.com", "S", "A", "hash", now))
        .await
        .unwrap();
    let editor = r.roles.create(new_role("editor")).await.unwrap();
    let reviewer = r.roles.create(new_role("reviewer")).await.unwrap();
    let publish = r.permissions.create(new_permission("Publish", "articles.publish")).await.unwrap();
    let review = r.permissions.create(new_permission("Review", "articles.review")).await.unwrap();

    r.grants.create(editor.id, publish.id, now).await.unwrap();
    let kept = r.grants.create(reviewer.id, review.id, now).await.unwrap();
    r.grants.create(reviewer.id, publish.id, now).await.unwrap();
    r.assignments.create(user.id, editor.id, now).await.unwrap();
    r.assignments.create(user.id, reviewer.id, now).await.unwrap();

    assert!(r.permissions.delete(publish.id).await.unwrap());
    let grants = r
        .grants
        .list(&RolePermissionFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(grants.results, vec![kept]);

    assert!(r.roles.delete(editor.id).await.unwrap());
    let filter = UserRoleFilter {
        user_id: Some(user.id),
        role_id: None,
    };
    assert_eq!(r.assignments.list(&filter, Pagination::default()).await.unwrap().count, 1);

    assert!(r.users.delete(user.id).await.unwrap());
    assert_eq!(r.assignments.list(&filter, Pagination::default()).await.unwrap().count, 0);
    assert!(r.roles.find_by_id(reviewer.id).await.unwrap().is_some());
}
