use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::domain::entities::{ArticleDraft, ArticleStatus, Category, User};
use crate::domain::value_objects::CategoryInput;
use crate::repositories::{
    InMemoryArticleRepository, InMemoryCategoryRepository, InMemoryCommentRepository,
    InMemoryMediaRepository, InMemoryUserRepository, MemoryStore, UserRepository,
};
use crate::services::clock::{Clock, ManualClock};
use crate::services::content::{ArticleService, CategoryService, CommentService, MediaService};

pub struct Content {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryUserRepository>,
    pub categories: CategoryService,
    pub articles: ArticleService,
    pub comments: CommentService,
    pub media: MediaService,
}

pub fn content() -> Content {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()));

    let users = Arc::new(InMemoryUserRepository::with_store(store.clone()));
    let category_repo = Arc::new(InMemoryCategoryRepository::with_store(store.clone()));
    let article_repo = Arc::new(InMemoryArticleRepository::with_store(store.clone()));
    let comment_repo = Arc::new(InMemoryCommentRepository::with_store(store.clone()));
    let media_repo = Arc::new(InMemoryMediaRepository::with_store(store.clone()));

    Content {
        categories: CategoryService::new(category_repo.clone(), clock.clone()),
        articles: ArticleService::new(
            article_repo.clone(),
            category_repo,
            comment_repo.clone(),
            media_repo.clone(),
            clock.clone(),
        ),
        comments: CommentService::new(comment_repo, article_repo.clone(), clock.clone()),
        media: MediaService::new(media_repo, article_repo, clock.clone()),
        store,
        clock,
        users,
    }
}

impl Content {
    pub async fn user(&self, name: &str) -> User {
        let user = User::new(
            name,
            format!("{}@example.com", name),
            "First",
            "Last",
            "hash",
            self.clock.now(),
        );
        self.users.create(user).await.unwrap()
    }

    pub async fn staff(&self, name: &str) -> User {
        let mut user = self.user(name).await;
        user.is_staff = true;
        self.users.update(user).await.unwrap()
    }

    pub async fn category(&self, name: &str) -> Category {
        self.categories
            .create(CategoryInput {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }
}

pub fn draft(title: &str, category_id: i64) -> ArticleDraft {
    ArticleDraft {
        title: title.to_string(),
        content: String::from("A long enough body about travelling."),
        seo_title: String::new(),
        seo_description: String::new(),
        main_image: None,
        category_id,
        status: ArticleStatus::Draft,
    }
}
