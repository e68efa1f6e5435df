//! HTTP handlers.
//!
//! Handlers parse input, hand a closure to [`AppState::run`] and map the
//! outcome to JSON. No SQL lives here.

mod articles;
mod catalog;

use crate::error::ApiError;
use crate::state::AppState;
use axum::routing::{get, put};
use axum::{Json, Router};
use inkwell_core::{
    ArticleService, CatalogService, SqliteArticleRepository, SqliteCatalogRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/articles/{id}/tags", put(articles::set_article_tags))
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(catalog::get_category)
                .patch(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/authors",
            get(catalog::list_authors).post(catalog::create_author),
        )
        .route(
            "/authors/{id}",
            get(catalog::get_author)
                .patch(catalog::update_author)
                .delete(catalog::delete_author),
        )
        .route("/tags", get(catalog::list_tags).post(catalog::create_tag))
        .route(
            "/tags/{id}",
            get(catalog::get_tag)
                .patch(catalog::update_tag)
                .delete(catalog::delete_tag),
        )
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: inkwell_core::core_version(),
    })
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("`{raw}` is not a valid id")))
}

fn article_service(conn: &Connection) -> ArticleService<SqliteArticleRepository<'_>> {
    ArticleService::new(SqliteArticleRepository::new(conn))
}

fn catalog_service(conn: &Connection) -> CatalogService<SqliteCatalogRepository<'_>> {
    CatalogService::new(SqliteCatalogRepository::new(conn))
}
