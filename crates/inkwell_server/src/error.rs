//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": "<kind>", "message": "<text>"}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inkwell_core::db::DbError;
use inkwell_core::{QueryError, RepoError, ServiceError};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    /// Malformed path, query string or body.
    #[error("{0}")]
    BadRequest(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Query(err) => Self::Query(err),
            ServiceError::Repo(err) => Self::Repo(err),
            ServiceError::InconsistentState(details) => Self::Internal(details.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Query(_) => (StatusCode::BAD_REQUEST, "invalid_filter"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            Self::Repo(err) => match err {
                RepoError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                RepoError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                RepoError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                RepoError::IntegrityFault { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "integrity_fault")
                }
                RepoError::Db(_)
                | RepoError::InvalidData(_)
                | RepoError::MissingRequiredTable(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage")
                }
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = self.to_string();
        if status.is_server_error() {
            error!(
                "event=http_error module=server status=error http_status={} kind={} error={}",
                status.as_u16(),
                kind,
                message
            );
        } else {
            warn!(
                "event=http_error module=server status=rejected http_status={} kind={} error={}",
                status.as_u16(),
                kind,
                message
            );
        }
        (
            status,
            Json(ErrorBody {
                error: kind,
                message,
            }),
        )
            .into_response()
    }
}

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("database schema check failed: {0}")]
    Schema(#[from] RepoError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server stopped with error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use inkwell_core::{QueryError, RepoError, ValidationError};
    use uuid::Uuid;

    #[test]
    fn errors_map_to_documented_statuses() {
        let cases = [
            (
                ApiError::Query(QueryError::InvalidFilter {
                    field: "limit",
                    message: "must be a positive integer".to_string(),
                }),
                StatusCode::BAD_REQUEST,
                "invalid_filter",
            ),
            (
                ApiError::Repo(RepoError::Validation(ValidationError::BlankField("title"))),
                StatusCode::BAD_REQUEST,
                "invalid_input",
            ),
            (
                ApiError::Repo(RepoError::NotFound {
                    entity: "author",
                    id: Uuid::nil(),
                }),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                ApiError::Repo(RepoError::Conflict("dup".to_string())),
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                ApiError::Repo(RepoError::IntegrityFault {
                    article_id: Uuid::nil(),
                    missing: "author",
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
                "integrity_fault",
            ),
        ];
        for (err, status, kind) in cases {
            assert_eq!(err.status_and_kind(), (status, kind), "{err}");
        }
    }
}
