use super::{catalog_service, parse_id};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::{
    Author, AuthorUpdate, AuthorWithArticles, Category, LabelUpdate, NewAuthor, NewLabel,
    PageParams, SqliteArticleRepository, Tag, TagWithArticles,
};

type JsonResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

// Categories

pub(super) async fn list_categories(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> JsonResult<Vec<Category>> {
    let Query(params) = query?;
    let categories = state
        .run(move |conn| Ok(catalog_service(conn).list_categories(&params)?))
        .await?;
    Ok(Json(categories))
}

pub(super) async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<NewLabel>, JsonRejection>,
) -> Created<Category> {
    let Json(category) = payload?;
    let created = state
        .run(move |conn| Ok(catalog_service(conn).create_category(&category)?))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn get_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> JsonResult<Category> {
    let id = parse_id(&raw_id)?;
    let category = state
        .run(move |conn| {
            catalog_service(conn)
                .get_category(id)?
                .ok_or_else(|| ApiError::not_found("category", id))
        })
        .await?;
    Ok(Json(category))
}

pub(super) async fn update_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<LabelUpdate>, JsonRejection>,
) -> JsonResult<Category> {
    let id = parse_id(&raw_id)?;
    let Json(update) = payload?;
    let updated = state
        .run(move |conn| Ok(catalog_service(conn).update_category(id, &update)?))
        .await?;
    Ok(Json(updated))
}

pub(super) async fn delete_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .run(move |conn| Ok(catalog_service(conn).delete_category(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Authors

pub(super) async fn list_authors(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> JsonResult<Vec<Author>> {
    let Query(params) = query?;
    let authors = state
        .run(move |conn| Ok(catalog_service(conn).list_authors(&params)?))
        .await?;
    Ok(Json(authors))
}

pub(super) async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<NewAuthor>, JsonRejection>,
) -> Created<Author> {
    let Json(author) = payload?;
    let created = state
        .run(move |conn| Ok(catalog_service(conn).create_author(&author)?))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn get_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> JsonResult<AuthorWithArticles> {
    let id = parse_id(&raw_id)?;
    let author = state
        .run(move |conn| {
            let articles = SqliteArticleRepository::new(conn);
            catalog_service(conn)
                .author_with_articles(&articles, id)?
                .ok_or_else(|| ApiError::not_found("author", id))
        })
        .await?;
    Ok(Json(author))
}

pub(super) async fn update_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<AuthorUpdate>, JsonRejection>,
) -> JsonResult<Author> {
    let id = parse_id(&raw_id)?;
    let Json(update) = payload?;
    let updated = state
        .run(move |conn| Ok(catalog_service(conn).update_author(id, &update)?))
        .await?;
    Ok(Json(updated))
}

pub(super) async fn delete_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .run(move |conn| Ok(catalog_service(conn).delete_author(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Tags

pub(super) async fn list_tags(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> JsonResult<Vec<Tag>> {
    let Query(params) = query?;
    let tags = state
        .run(move |conn| Ok(catalog_service(conn).list_tags(&params)?))
        .await?;
    Ok(Json(tags))
}

pub(super) async fn create_tag(
    State(state): State<AppState>,
    payload: Result<Json<NewLabel>, JsonRejection>,
) -> Created<Tag> {
    let Json(tag) = payload?;
    let created = state
        .run(move |conn| Ok(catalog_service(conn).create_tag(&tag)?))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn get_tag(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> JsonResult<TagWithArticles> {
    let id = parse_id(&raw_id)?;
    let tag = state
        .run(move |conn| {
            let articles = SqliteArticleRepository::new(conn);
            catalog_service(conn)
                .tag_with_articles(&articles, id)?
                .ok_or_else(|| ApiError::not_found("tag", id))
        })
        .await?;
    Ok(Json(tag))
}

pub(super) async fn update_tag(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<LabelUpdate>, JsonRejection>,
) -> JsonResult<Tag> {
    let id = parse_id(&raw_id)?;
    let Json(update) = payload?;
    let updated = state
        .run(move |conn| Ok(catalog_service(conn).update_tag(id, &update)?))
        .await?;
    Ok(Json(updated))
}

pub(super) async fn delete_tag(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .run(move |conn| Ok(catalog_service(conn).delete_tag(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
