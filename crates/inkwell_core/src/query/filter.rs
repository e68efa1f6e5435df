//! Article filter and page parsing.
//!
//! Raw parameters arrive as optional strings so that malformed numbers are
//! reported as [`QueryError::InvalidFilter`] instead of a transport-level
//! rejection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Default page size for article listings.
pub const ARTICLES_DEFAULT_LIMIT: u32 = 100;
/// Default page size for category listings.
pub const CATEGORIES_DEFAULT_LIMIT: u32 = 50;
/// Upper bound applied to every `limit`. Larger values are clamped, not rejected.
pub const LIMIT_MAX: u32 = 100;

pub type QueryResult<T> = Result<T, QueryError>;

/// Caller-side mistake in list parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid filter `{field}`: {message}")]
    InvalidFilter {
        field: &'static str,
        message: String,
    },
}

impl QueryError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field,
            message: message.into(),
        }
    }
}

/// Raw `GET /articles` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Comma-separated tag names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Raw `offset`/`limit` parameters for plain list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// Builds a page, clamping `limit` into `1..=LIMIT_MAX`.
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, LIMIT_MAX),
        }
    }

    pub fn from_params(params: &PageParams, default_limit: u32) -> QueryResult<Self> {
        let offset = parse_offset(params.offset.as_deref())?;
        let limit = parse_limit(params.limit.as_deref(), default_limit)?;
        Ok(Self { offset, limit })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, ARTICLES_DEFAULT_LIMIT)
    }
}

/// Normalized article filter consumed by the article query builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Exact, case-sensitive category name.
    pub category: Option<String>,
    /// Deduplicated, trimmed tag names. Never `Some(empty)`.
    pub tags: Option<Vec<String>>,
    /// Case-insensitive substring matched against title and content, kept
    /// exactly as given. Never `Some("")`.
    pub search: Option<String>,
    pub page: Page,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            category: None,
            tags: None,
            search: None,
            page: Page::default(),
        }
    }
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(Some(category.into()));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tag_names(tags);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_empty(Some(search.into()));
        self
    }

    pub fn with_page(mut self, offset: u32, limit: u32) -> Self {
        self.page = Page::new(offset, limit);
        self
    }

    /// Parses raw query parameters.
    ///
    /// # Errors
    /// - `InvalidFilter` when `offset`/`limit` are non-numeric or negative,
    ///   or when `limit` is zero.
    pub fn from_params(params: &ArticleQueryParams) -> QueryResult<Self> {
        let offset = parse_offset(params.offset.as_deref())?;
        let limit = parse_limit(params.limit.as_deref(), ARTICLES_DEFAULT_LIMIT)?;
        Ok(Self {
            category: non_blank(params.category.clone()),
            tags: params.tags.as_deref().and_then(|raw| {
                let names = parse_tag_list(raw);
                if names.is_empty() {
                    None
                } else {
                    Some(names)
                }
            }),
            search: non_empty(params.search.clone()),
            page: Page { offset, limit },
        })
    }

    /// Renders the filter back into raw parameters (the inverse of
    /// [`ArticleFilter::from_params`] for normalized values).
    pub fn to_params(&self) -> ArticleQueryParams {
        ArticleQueryParams {
            category: self.category.clone(),
            tags: self.tags.as_ref().map(|names| names.join(",")),
            search: self.search.clone(),
            offset: Some(self.page.offset.to_string()),
            limit: Some(self.page.limit.to_string()),
        }
    }
}

/// Splits a comma-separated tag list, trimming each name and dropping blanks
/// and duplicates. Names are compared case-sensitively.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_tag_names(raw.split(',')).unwrap_or_default()
}

fn normalize_tag_names<I, S>(tags: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique = tags
        .into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>();
    if unique.is_empty() {
        None
    } else {
        Some(unique.into_iter().collect())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

fn parse_offset(raw: Option<&str>) -> QueryResult<u32> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(0);
    };
    let value: i64 = text
        .parse()
        .map_err(|_| QueryError::invalid("offset", format!("`{text}` is not an integer")))?;
    if value < 0 {
        return Err(QueryError::invalid("offset", "must not be negative"));
    }
    u32::try_from(value).map_err(|_| QueryError::invalid("offset", "is too large"))
}

fn parse_limit(raw: Option<&str>, default_limit: u32) -> QueryResult<u32> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(default_limit.min(LIMIT_MAX));
    };
    let value: i64 = text
        .parse()
        .map_err(|_| QueryError::invalid("limit", format!("`{text}` is not an integer")))?;
    if value <= 0 {
        return Err(QueryError::invalid("limit", "must be a positive integer"));
    }
    Ok(value.min(i64::from(LIMIT_MAX)) as u32)
}
