//! Services shared by every handler

use std::sync::Arc;

use sefr_core::services::{
    AccessService, ArticleService, AuthService, AuthServiceConfig, CategoryService, Clock,
    CommentService, DigitSource, HealthService, MediaService, TokenService, UserService,
    VerificationManager,
};
use sefr_infra::InfrastructureServices;
use sefr_shared::AppConfig;

/// Application state handed to handlers as `web::Data<AppState>`
pub struct AppState {
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<UserService>,
    pub categories: Arc<CategoryService>,
    pub articles: Arc<ArticleService>,
    pub comments: Arc<CommentService>,
    pub media: Arc<MediaService>,
    pub access: Arc<AccessService>,
    pub health: Arc<HealthService>,
}

impl AppState {
    /// Wire the services over the given infrastructure
    pub fn build(
        config: AppConfig,
        infra: &InfrastructureServices,
        clock: Arc<dyn Clock>,
        digits: Arc<dyn DigitSource>,
    ) -> Self {
        let repos = &infra.repositories;
        let auth_config = AuthServiceConfig::from_app_config(&config);

        let verification = Arc::new(VerificationManager::new(
            repos.users.clone(),
            clock.clone(),
            digits,
            config.verification.clone(),
        ));
        let tokens = Arc::new(TokenService::new(
            config.auth.jwt.clone(),
            infra.blacklist.clone(),
            clock.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            repos.users.clone(),
            verification,
            tokens.clone(),
            infra.mailer.clone(),
            clock.clone(),
            auth_config.clone(),
        ));

        let health = Arc::new(HealthService::new(
            infra.health.clone(),
            clock.clone(),
            config.environment.to_string(),
            env!("CARGO_PKG_VERSION"),
        ));

        Self {
            auth,
            tokens,
            users: Arc::new(UserService::new(repos.users.clone(), clock.clone(), auth_config)),
            categories: Arc::new(CategoryService::new(repos.categories.clone(), clock.clone())),
            articles: Arc::new(ArticleService::new(
                repos.articles.clone(),
                repos.categories.clone(),
                repos.comments.clone(),
                repos.media.clone(),
                clock.clone(),
            )),
            comments: Arc::new(CommentService::new(
                repos.comments.clone(),
                repos.articles.clone(),
                clock.clone(),
            )),
            media: Arc::new(MediaService::new(
                repos.media.clone(),
                repos.articles.clone(),
                clock.clone(),
            )),
            access: Arc::new(AccessService::new(
                repos.roles.clone(),
                repos.permissions.clone(),
                repos.role_permissions.clone(),
                repos.user_roles.clone(),
                repos.users.clone(),
                clock,
            )),
            health,
            config,
        }
    }
}
