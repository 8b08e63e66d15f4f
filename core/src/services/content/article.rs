use std::sync::Arc;

use sefr_shared::slug::{slug_candidates, slugify};
use sefr_shared::types::{PaginatedResponse, Pagination};
use sefr_shared::validation::{char_length_between, is_valid_url, not_blank};

use crate::domain::entities::{Article, ArticleDraft, ArticleLike, ArticleView, User};
use crate::domain::value_objects::{ArticleDetail, LikeOutcome};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{
    ArticleFilter, ArticleRepository, CategoryRepository, CommentRepository, MediaRepository,
};
use crate::services::clock::Clock;

use super::ensure_can_modify;

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 200;
const SEO_TITLE_MAX: usize = 200;
const SEO_DESCRIPTION_MAX: usize = 500;

/// Articles, their likes and their views
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    categories: Arc<dyn CategoryRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaRepository>,
    clock: Arc<dyn Clock>,
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        categories: Arc<dyn CategoryRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            articles,
            categories,
            comments,
            media,
            clock,
        }
    }

    pub async fn list(
        &self,
        filter: &ArticleFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Article>> {
        self.articles.list(filter, pagination.normalized()).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> DomainResult<Article> {
        self.articles
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Article"))
    }

    /// The article with its media, comments and like/view counts
    pub async fn detail(&self, slug: &str) -> DomainResult<ArticleDetail> {
        let article = self.get_by_slug(slug).await?;
        let media = self.media.list_for_article(article.id).await?;
        let comments = self.comments.list_for_article(article.id).await?;
        let likes_count = self.articles.count_likes(article.id).await?;
        let views_count = self.articles.count_views(article.id).await?;

        Ok(ArticleDetail {
            article,
            media,
            comments,
            likes_count,
            views_count,
        })
    }

    /// Create an article authored by `author`. The slug comes from the
    /// title, suffixed `-2`, `-3`, ... when taken.
    pub async fn create(&self, author: &User, draft: ArticleDraft) -> DomainResult<Article> {
        let draft = self.validate(draft).await?;
        let slug = self.free_slug(&draft.title).await?;

        let article = Article::new(draft, slug, author.id, self.clock.now());
        let article = self.articles.create(article).await?;
        tracing::info!(
            article_id = %article.id,
            author_id = %author.id,
            slug = %article.slug,
            status = article.status.as_str(),
            event = "article_created",
            "Article created"
        );
        Ok(article)
    }

    /// Replace the editable fields. The slug stays stable.
    pub async fn update(&self, actor: &User, slug: &str, draft: ArticleDraft) -> DomainResult<Article> {
        let mut article = self.get_by_slug(slug).await?;
        ensure_can_modify(actor, article.author_id, "article")?;
        let draft = self.validate(draft).await?;
        let now = self.clock.now();

        article.title = draft.title;
        article.content = draft.content;
        article.seo_title = draft.seo_title;
        article.seo_description = draft.seo_description;
        article.main_image = draft.main_image;
        article.category_id = draft.category_id;
        article.set_status(draft.status, now);

        self.articles.update(article).await
    }

    pub async fn delete(&self, actor: &User, slug: &str) -> DomainResult<()> {
        let article = self.get_by_slug(slug).await?;
        ensure_can_modify(actor, article.author_id, "article")?;
        self.articles.delete(article.id).await?;
        tracing::info!(article_id = %article.id, event = "article_deleted", "Article deleted");
        Ok(())
    }

    /// Like an article once per user
    pub async fn like(&self, user: &User, slug: &str) -> DomainResult<LikeOutcome> {
        let article = self.get_by_slug(slug).await?;
        let created = self
            .articles
            .add_like(ArticleLike {
                article_id: article.id,
                user_id: user.id,
                created_at: self.clock.now(),
            })
            .await?;

        Ok(if created {
            LikeOutcome::Liked
        } else {
            LikeOutcome::AlreadyLiked
        })
    }

    /// Record that `user` viewed the article. Only the first view per user
    /// counts towards `view_count`.
    pub async fn view(&self, user: &User, slug: &str) -> DomainResult<()> {
        let article = self.get_by_slug(slug).await?;
        let first = self
            .articles
            .record_view(ArticleView {
                article_id: article.id,
                user_id: user.id,
                viewed_at: self.clock.now(),
            })
            .await?;
        tracing::debug!(article_id = %article.id, first_view = first, "Article viewed");
        Ok(())
    }

    async fn validate(&self, mut draft: ArticleDraft) -> DomainResult<ArticleDraft> {
        draft.title = draft.title.trim().to_string();
        if !char_length_between(&draft.title, TITLE_MIN, TITLE_MAX) {
            return Err(ValidationError::InvalidLength {
                field: String::from("title"),
                min: TITLE_MIN,
                max: TITLE_MAX,
                actual: draft.title.chars().count(),
            }
            .into());
        }
        if !not_blank(&draft.content) {
            return Err(ValidationError::required("content").into());
        }
        if draft.seo_title.chars().count() > SEO_TITLE_MAX {
            return Err(ValidationError::InvalidLength {
                field: String::from("seo_title"),
                min: 0,
                max: SEO_TITLE_MAX,
                actual: draft.seo_title.chars().count(),
            }
            .into());
        }
        if draft.seo_description.chars().count() > SEO_DESCRIPTION_MAX {
            return Err(ValidationError::InvalidLength {
                field: String::from("seo_description"),
                min: 0,
                max: SEO_DESCRIPTION_MAX,
                actual: draft.seo_description.chars().count(),
            }
            .into());
        }
        draft.main_image = draft
            .main_image
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &draft.main_image {
            if !is_valid_url(url) {
                return Err(ValidationError::InvalidUrl.into());
            }
        }
        if self.categories.find_by_id(draft.category_id).await?.is_none() {
            return Err(DomainError::Validation {
                message: format!("Category {} does not exist", draft.category_id),
            });
        }
        Ok(draft)
    }

    async fn free_slug(&self, title: &str) -> DomainResult<String> {
        let base = slugify(title);
        if base.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: String::from("title"),
            }
            .into());
        }
        for candidate in slug_candidates(&base) {
            if !self.articles.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Ok(base)
    }
}
