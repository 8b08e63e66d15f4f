use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use sefr_shared::types::Pagination;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::value_objects::{
    PermissionChanges, PermissionInput, RoleChanges, RoleInput, RolePermissionChanges,
    UserRoleChanges,
};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::{
    InMemoryPermissionRepository, InMemoryRolePermissionRepository, InMemoryRoleRepository,
    InMemoryUserRepository, InMemoryUserRoleRepository, MemoryStore, RolePermissionFilter,
    UserRepository, UserRoleFilter,
};
use crate::services::access::AccessService;
use crate::services::clock::ManualClock;

struct Setup {
    service: AccessService,
    users: Arc<InMemoryUserRepository>,
    clock: Arc<ManualClock>,
}

fn setup() -> Setup {
    let store = Arc::new(MemoryStore::new());
    let users = Arc::new(InMemoryUserRepository::with_store(store.clone()));
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()));
    Setup {
        service: AccessService::new(
            Arc::new(InMemoryRoleRepository::with_store(store.clone())),
            Arc::new(InMemoryPermissionRepository::with_store(store.clone())),
            Arc::new(InMemoryRolePermissionRepository::with_store(store.clone())),
            Arc::new(InMemoryUserRoleRepository::with_store(store)),
            users.clone(),
            clock.clone(),
        ),
        users,
        clock,
    }
}

async fn create(users: &InMemoryUserRepository, name: &str, staff: bool) -> User {
    let mut user = User::new(
        name,
        format!("{}@example.com", name),
        "First",
        "Last",
        "hash",
        Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
    );
    user.is_staff = staff;
    users.create(user).await.unwrap()
}

fn role(name: &str) -> RoleInput {
    RoleInput {
        name: name.to_string(),
        description: String::from("  Writes and edits articles "),
    }
}

fn permission(name: &str, codename: &str) -> PermissionInput {
    PermissionInput {
        name: name.to_string(),
        codename: codename.to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn test_only_staff_change_roles() {
    let s = setup();
    let reader = create(&s.users, "reader", false).await;
    let admin = create(&s.users, "admin", true).await;

    let err = s.service.create_role(&reader, role("editor")).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let editor = s.service.create_role(&admin, role(" editor ")).await.unwrap();
    assert_eq!(editor.name, "editor");
    assert_eq!(editor.description, "Writes and edits articles");

    let err = s
        .service
        .update_role(&reader, editor.id, RoleChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
    let err = s.service.delete_role(&reader, editor.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    // Reads are open to everyone signed in
    assert_eq!(s.service.list_roles(Pagination::default()).await.unwrap().count, 1);
    assert_eq!(s.service.get_role(editor.id).await.unwrap(), editor);
}

#[tokio::test]
async fn test_role_validation_and_partial_update() {
    let s = setup();
    let admin = create(&s.users, "admin", true).await;

    let err = s.service.create_role(&admin, role("   ")).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationErr(ValidationError::RequiredField { .. })));
    let err = s.service.create_role(&admin, role(&"x".repeat(51))).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationErr(ValidationError::InvalidLength { max: 50, .. })));

    let editor = s.service.create_role(&admin, role("editor")).await.unwrap();
    s.clock.advance(Duration::minutes(5));
    let updated = s
        .service
        .update_role(
            &admin,
            editor.id,
            RoleChanges {
                description: Some(String::from("Edits")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "editor");
    assert_eq!(updated.description, "Edits");
    assert!(updated.updated_at > editor.updated_at);

    s.service.create_role(&admin, role("reviewer")).await.unwrap();
    let err = s
        .service
        .update_role(&admin, editor.id, role("reviewer").into())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationErr(ValidationError::DuplicateValue { .. })));
}

#[tokio::test]
async fn test_permission_codename_rules() {
    let s = setup();
    let admin = create(&s.users, "admin", true).await;

    let err = s
        .service
        .create_permission(&admin, permission("Publish", "articles publish"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationErr(ValidationError::InvalidFormat { .. })));

    let publish = s
        .service
        .create_permission(&admin, permission("Publish", "articles.publish"))
        .await
        .unwrap();
    let err = s
        .service
        .create_permission(&admin, permission("Publish now", "articles.publish"))
        .await
        .unwrap_err();
    match err {
        DomainError::ValidationErr(ValidationError::DuplicateValue { field }) => assert_eq!(field, "codename"),
        other => panic!("unexpected error: {:?}", other),
    }

    let renamed = s
        .service
        .update_permission(
            &admin,
            publish.id,
            PermissionChanges {
                codename: Some(String::from("articles.release")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Publish");
    assert_eq!(renamed.codename, "articles.release");
}

#[tokio::test]
async fn test_grants_and_assignments() {
    let s = setup();
    let admin = create(&s.users, "admin", true).await;
    let writer = create(&s.users, "writer", false).await;
    let editor = s.service.create_role(&admin, role("editor")).await.unwrap();
    let reviewer = s.service.create_role(&admin, role("reviewer")).await.unwrap();
    let publish = s
        .service
        .create_permission(&admin, permission("Publish", "articles.publish"))
        .await
        .unwrap();

    let grant = s.service.grant(&admin, editor.id, publish.id).await.unwrap();
    let err = s.service.grant(&admin, editor.id, publish.id).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationErr(ValidationError::DuplicateValue { .. })));
    let err = s.service.grant(&admin, 4242, publish.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let moved = s
        .service
        .update_grant(
            &admin,
            grant.id,
            RolePermissionChanges {
                role_id: Some(reviewer.id),
                permission_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.role_id, reviewer.id);
    assert_eq!(moved.permission_id, publish.id);

    let err = s.service.assign(&writer, writer.id, editor.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
    let err = s.service.assign(&admin, Uuid::new_v4(), editor.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let assignment = s.service.assign(&admin, writer.id, editor.id).await.unwrap();
    let err = s
        .service
        .update_assignment(
            &admin,
            assignment.id,
            UserRoleChanges {
                role_id: Some(4242),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let mine = UserRoleFilter {
        user_id: Some(writer.id),
        role_id: None,
    };
    assert_eq!(s.service.list_assignments(&mine, Pagination::default()).await.unwrap().count, 1);

    s.service.unassign(&admin, assignment.id).await.unwrap();
    assert!(matches!(
        s.service.get_assignment(assignment.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));

    s.service.delete_permission(&admin, publish.id).await.unwrap();
    let grants = s
        .service
        .list_grants(&RolePermissionFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(grants.count, 0);
}
