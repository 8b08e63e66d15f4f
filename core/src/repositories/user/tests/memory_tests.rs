//! Tests for the in-memory user repository

use chrono::{Duration, Utc};
use sefr_shared::types::Pagination;

use crate::domain::entities::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{InMemoryUserRepository, UserRepository};

fn user(username: &str, email: &str) -> User {
    User::new(username, email, "Test", "User", "hash", Utc::now())
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryUserRepository::new();
    let created = repo.create(user("reader", "reader@example.com")).await.unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(by_id.as_ref().map(|u| u.email.as_str()), Some("reader@example.com"));

    assert!(repo.find_by_email("reader@example.com").await.unwrap().is_some());
    assert!(repo.find_by_username("reader").await.unwrap().is_some());
    assert!(repo.exists_by_email("reader@example.com").await.unwrap());
    assert!(!repo.exists_by_username("writer").await.unwrap());
}

#[tokio::test]
async fn test_duplicates_rejected() {
    let repo = InMemoryUserRepository::new();
    repo.create(user("reader", "reader@example.com")).await.unwrap();

    let err = repo.create(user("other", "reader@example.com")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::UserAlreadyExists { ref field }) if field == "email"
    ));

    let err = repo.create(user("reader", "other@example.com")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::UserAlreadyExists { ref field }) if field == "username"
    ));
}

#[tokio::test]
async fn test_update_requires_existing_user() {
    let repo = InMemoryUserRepository::new();
    let err = repo.update(user("ghost", "ghost@example.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_unavailable_store_fails_without_writing() {
    let repo = InMemoryUserRepository::new();
    let mut stored = repo.create(user("reader", "reader@example.com")).await.unwrap();

    repo.store().set_unavailable(true);
    stored.first_name = "Changed".into();
    let err = repo.update(stored.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::Store { .. }));

    repo.store().set_unavailable(false);
    let reloaded = repo.find_by_id(stored.id).await.unwrap().unwrap();
    assert_eq!(reloaded.first_name, "Test");
}

#[tokio::test]
async fn test_list_newest_first() {
    let repo = InMemoryUserRepository::new();
    let now = Utc::now();
    for (i, name) in ["a", "b", "c"].iter().enumerate() {
        let mut u = user(name, &format!("{}@example.com", name));
        u.created_at = now + Duration::seconds(i as i64);
        repo.create(u).await.unwrap();
    }

    let page = repo.list(Pagination::new(1, 2)).await.unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.total_pages, 2);
    let names: Vec<_> = page.results.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["c", "b"]);
}
