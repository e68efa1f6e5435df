use super::{article_service, parse_id};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::{
    ArticleQueryParams, ArticleTagsUpdate, ArticleUpdate, ArticleWithDetails, NewArticle,
};

type JsonResult<T> = Result<Json<T>, ApiError>;

pub(super) async fn list_articles(
    State(state): State<AppState>,
    query: Result<Query<ArticleQueryParams>, QueryRejection>,
) -> JsonResult<Vec<ArticleWithDetails>> {
    let Query(params) = query?;
    let articles = state
        .run(move |conn| Ok(article_service(conn).list_articles(&params)?))
        .await?;
    Ok(Json(articles))
}

pub(super) async fn get_article(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> JsonResult<ArticleWithDetails> {
    let id = parse_id(&raw_id)?;
    let article = state
        .run(move |conn| {
            article_service(conn)
                .get_article(id)?
                .ok_or_else(|| ApiError::not_found("article", id))
        })
        .await?;
    Ok(Json(article))
}

pub(super) async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleWithDetails>), ApiError> {
    let Json(article) = payload?;
    let created = state
        .run(move |conn| Ok(article_service(conn).create_article(&article)?))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn update_article(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ArticleUpdate>, JsonRejection>,
) -> JsonResult<ArticleWithDetails> {
    let id = parse_id(&raw_id)?;
    let Json(update) = payload?;
    let updated = state
        .run(move |conn| Ok(article_service(conn).update_article(id, &update)?))
        .await?;
    Ok(Json(updated))
}

pub(super) async fn set_article_tags(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ArticleTagsUpdate>, JsonRejection>,
) -> JsonResult<ArticleWithDetails> {
    let id = parse_id(&raw_id)?;
    let Json(update) = payload?;
    let tagged = state
        .run(move |conn| Ok(article_service(conn).set_article_tags(id, &update.tag_ids)?))
        .await?;
    Ok(Json(tagged))
}

pub(super) async fn delete_article(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .run(move |conn| Ok(article_service(conn).delete_article(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
