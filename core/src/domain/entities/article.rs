//! Article entity with its publication workflow, plus like and view records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Review,
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Review => "review",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "review" => Ok(ArticleStatus::Review),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            other => Err(format!("Unknown article status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    /// Unique, used for lookups in URLs
    pub slug: String,
    pub content: String,
    pub seo_title: String,
    pub seo_description: String,
    pub main_image: Option<String>,
    pub author_id: Uuid,
    pub category_id: i64,
    pub status: ArticleStatus,
    /// Distinct readers who opened the article
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// First time the article went live; kept when it is later archived
    pub published_at: Option<DateTime<Utc>>,
}

/// Fields an author supplies when writing an article
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub seo_title: String,
    pub seo_description: String,
    pub main_image: Option<String>,
    pub category_id: i64,
    pub status: ArticleStatus,
}

impl Article {
    pub fn new(draft: ArticleDraft, slug: String, author_id: Uuid, now: DateTime<Utc>) -> Self {
        let mut article = Self {
            id: Uuid::new_v4(),
            title: draft.title,
            slug,
            content: draft.content,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
            main_image: draft.main_image,
            author_id,
            category_id: draft.category_id,
            status: ArticleStatus::Draft,
            view_count: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        article.set_status(draft.status, now);
        article
    }

    /// Change status, stamping `published_at` the first time it is published
    pub fn set_status(&mut self, status: ArticleStatus, now: DateTime<Utc>) {
        if status == ArticleStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
        self.updated_at = now;
    }

    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

/// One user's like of one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLike {
    pub article_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// First time a user opened an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleView {
    pub article_id: Uuid,
    pub user_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(status: ArticleStatus) -> ArticleDraft {
        ArticleDraft {
            title: "Ten days in Isfahan".into(),
            content: "Bridges, tea houses and tiles.".into(),
            category_id: 1,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_has_no_publish_date() {
        let article = Article::new(draft(ArticleStatus::Draft), "ten-days".into(), Uuid::new_v4(), Utc::now());
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.published_at.is_none());
        assert_eq!(article.view_count, 0);
    }

    #[test]
    fn test_published_at_set_once() {
        let now = Utc::now();
        let mut article = Article::new(draft(ArticleStatus::Published), "ten-days".into(), Uuid::new_v4(), now);
        assert_eq!(article.published_at, Some(now));

        let later = now + Duration::days(2);
        article.set_status(ArticleStatus::Archived, later);
        article.set_status(ArticleStatus::Published, later + Duration::days(1));

        assert!(article.is_published());
        assert_eq!(article.published_at, Some(now));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("review".parse::<ArticleStatus>().unwrap(), ArticleStatus::Review);
        assert_eq!(ArticleStatus::Archived.as_str(), "archived");
        assert!("Published".parse::<ArticleStatus>().is_err());
    }
}
