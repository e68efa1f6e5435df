//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Parse raw list parameters before they reach repositories.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod article_service;
pub mod catalog_service;
pub mod seed;

use crate::query::QueryError;
use crate::repo::RepoError;
use thiserror::Error;

/// Service error: either a caller mistake or a persistence failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    /// Internal consistency mismatch between write and read-back.
    #[error("inconsistent state: {0}")]
    InconsistentState(&'static str),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
