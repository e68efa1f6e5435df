//! Core domain logic for the Inkwell blog.
//! This crate owns the data model, the article query builder and storage.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::article::{
    Article, ArticleId, ArticleTagsUpdate, ArticleUpdate, ArticleWithDetails, NewArticle,
};
pub use model::catalog::{
    Author, AuthorId, AuthorUpdate, AuthorWithArticles, Category, CategoryId, LabelUpdate,
    NewAuthor, NewLabel, Tag, TagId, TagWithArticles,
};
pub use model::ValidationError;
pub use query::{ArticleFilter, ArticleQueryParams, Page, PageParams, QueryError};
pub use repo::article_repo::{ArticleRepository, SqliteArticleRepository};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::{ensure_schema, RepoError, RepoResult};
pub use service::article_service::ArticleService;
pub use service::catalog_service::CatalogService;
pub use service::seed::{seed_demo_content, SeedOutcome};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
