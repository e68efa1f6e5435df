//! Filter and pagination inputs for list queries.
//!
//! # Responsibility
//! - Parse raw query-string parameters into typed, normalized filters.
//! - Own the pagination defaults and the limit clamp.
//!
//! # Invariants
//! - A parsed `ArticleFilter` always has `1 <= limit <= 100`.
//! - Blank optional parameters are treated as absent.

pub mod filter;

pub use filter::{
    parse_tag_list, ArticleFilter, ArticleQueryParams, Page, PageParams, QueryError,
    QueryResult, ARTICLES_DEFAULT_LIMIT, CATEGORIES_DEFAULT_LIMIT, LIMIT_MAX,
};
