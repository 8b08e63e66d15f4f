use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use sefr_shared::types::Pagination;

use crate::domain::entities::User;
use crate::domain::value_objects::UserChanges;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{InMemoryUserRepository, UserRepository};
use crate::services::auth::{verify_password, AuthServiceConfig};
use crate::services::clock::ManualClock;
use crate::services::user::UserService;

struct Setup {
    service: UserService,
    users: Arc<InMemoryUserRepository>,
    clock: Arc<ManualClock>,
}

fn setup() -> Setup {
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()));
    let config = AuthServiceConfig {
        bcrypt_cost: 4,
        ..Default::default()
    };
    Setup {
        service: UserService::new(users.clone(), clock.clone(), config),
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
        Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap(),
    );
    user.is_staff = staff;
    users.create(user).await.unwrap()
}

#[tokio::test]
async fn test_owner_updates_profile() {
    let s = setup();
    let user = create(&s.users, "reader", false).await;
    s.clock.advance(Duration::minutes(10));

    let updated = s
        .service
        .update(
            &user,
            user.id,
            UserChanges {
                first_name: Some(String::from(" Sara ")),
                password: Some(String::from("new-secret-1")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Sara");
    assert_eq!(updated.last_name, "Last");
    assert_eq!(updated.updated_at, user.updated_at + Duration::minutes(10));
    assert!(verify_password("new-secret-1", &updated.password_hash).await.unwrap());
}

#[tokio::test]
async fn test_permissions() {
    let s = setup();
    let owner = create(&s.users, "owner", false).await;
    let other = create(&s.users, "other", false).await;
    let staff = create(&s.users, "staff", true).await;

    let err = s
        .service
        .update(&other, owner.id, UserChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InsufficientPermissions)));

    let err = s.service.delete(&other, owner.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InsufficientPermissions)));

    s.service.delete(&staff, owner.id).await.unwrap();
    let err = s.service.get(owner.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::UserNotFound)));
}

#[tokio::test]
async fn test_username_rules() {
    let s = setup();
    let user = create(&s.users, "reader", false).await;
    create(&s.users, "taken", false).await;

    let err = s
        .service
        .update(
            &user,
            user.id,
            UserChanges {
                username: Some(String::from("has spaces")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationErr(ValidationError::InvalidFormat { .. })));

    let err = s
        .service
        .update(
            &user,
            user.id,
            UserChanges {
                username: Some(String::from("taken")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::UserAlreadyExists { .. })));

    let err = s
        .service
        .update(
            &user,
            user.id,
            UserChanges {
                password: Some(String::from("12345678")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::PasswordEntirelyNumeric)
    ));
}

#[tokio::test]
async fn test_list_paginates() {
    let s = setup();
    for name in ["a1", "a2", "a3"] {
        create(&s.users, name, false).await;
    }
    let page = s.service.list(Pagination::new(2, 2)).await.unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.results.len(), 1);
}
