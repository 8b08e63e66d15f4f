//! Process-local tables backing the in-memory repositories.
//!
//! All repositories created from one [`MemoryStore`] see the same data, and
//! deletes cascade across tables the way the MySQL foreign keys do.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{
    Article, ArticleLike, ArticleView, Category, Comment, Media, Permission, Role, RolePermission,
    User, UserRole,
};
use crate::errors::{DomainError, DomainResult};

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: HashMap<Uuid, User>,
    pub categories: HashMap<i64, Category>,
    pub articles: HashMap<Uuid, Article>,
    pub likes: HashMap<(Uuid, Uuid), ArticleLike>,
    pub views: HashMap<(Uuid, Uuid), ArticleView>,
    pub comments: HashMap<i64, Comment>,
    pub media: HashMap<i64, Media>,
    pub roles: HashMap<i64, Role>,
    pub permissions: HashMap<i64, Permission>,
    pub role_permissions: HashMap<i64, RolePermission>,
    pub user_roles: HashMap<i64, UserRole>,
    next_id: i64,
}

impl Tables {
    /// Auto-increment shared by the integer-keyed tables
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn cascade_delete_user(&mut self, id: Uuid) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let articles: Vec<Uuid> = self
            .articles
            .values()
            .filter(|a| a.author_id == id)
            .map(|a| a.id)
            .collect();
        for article_id in articles {
            self.cascade_delete_article(article_id);
        }
        let comments: Vec<i64> = self
            .comments
            .values()
            .filter(|c| c.author_id == id)
            .map(|c| c.id)
            .collect();
        for comment_id in comments {
            self.cascade_delete_comment(comment_id);
        }
        self.likes.retain(|(_, user_id), _| *user_id != id);
        self.views.retain(|(_, user_id), _| *user_id != id);
        self.user_roles.retain(|_, a| a.user_id != id);
        true
    }

    pub fn cascade_delete_role(&mut self, id: i64) -> bool {
        if self.roles.remove(&id).is_none() {
            return false;
        }
        self.role_permissions.retain(|_, g| g.role_id != id);
        self.user_roles.retain(|_, a| a.role_id != id);
        true
    }

    pub fn cascade_delete_permission(&mut self, id: i64) -> bool {
        if self.permissions.remove(&id).is_none() {
            return false;
        }
        self.role_permissions.retain(|_, g| g.permission_id != id);
        true
    }

    pub fn cascade_delete_category(&mut self, id: i64) -> bool {
        if self.categories.remove(&id).is_none() {
            return false;
        }
        let children: Vec<i64> = self
            .categories
            .values()
            .filter(|c| c.parent_id == Some(id))
            .map(|c| c.id)
            .collect();
        for child in children {
            self.cascade_delete_category(child);
        }
        let articles: Vec<Uuid> = self
            .articles
            .values()
            .filter(|a| a.category_id == id)
            .map(|a| a.id)
            .collect();
        for article_id in articles {
            self.cascade_delete_article(article_id);
        }
        true
    }

    pub fn cascade_delete_article(&mut self, id: Uuid) -> bool {
        if self.articles.remove(&id).is_none() {
            return false;
        }
        self.likes.retain(|(article_id, _), _| *article_id != id);
        self.views.retain(|(article_id, _), _| *article_id != id);
        self.media.retain(|_, m| m.article_id != id);
        self.comments.retain(|_, c| c.article_id != id);
        true
    }

    pub fn cascade_delete_comment(&mut self, id: i64) -> bool {
        if self.comments.remove(&id).is_none() {
            return false;
        }
        let mut doomed: HashSet<i64> = HashSet::from([id]);
        loop {
            let replies: Vec<i64> = self
                .comments
                .values()
                .filter(|c| c.parent_id.is_some_and(|p| doomed.contains(&p)))
                .map(|c| c.id)
                .collect();
            if replies.is_empty() {
                break;
            }
            for reply in replies {
                self.comments.remove(&reply);
                doomed.insert(reply);
            }
        }
        true
    }
}

/// Shared in-memory database
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a store error, simulating a
    /// lost database connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }

    pub(crate) fn check(&self) -> DomainResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(DomainError::store("in-memory store is unavailable"))
        }
    }
}
