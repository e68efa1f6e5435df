//! Article records and their detailed projection.
//!
//! # Invariants
//! - `author_id` and `category_id` always resolve to existing rows; the
//!   store enforces this with foreign keys at write time.
//! - `ArticleWithDetails::tags` is the full tag set of the article, never a
//!   filtered subset.

use super::catalog::{Author, AuthorId, Category, CategoryId, Tag, TagId};
use super::{require_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ArticleId = Uuid;

/// Flat article row, as returned by write endpoints and summary lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    /// `None` for drafts.
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
}

/// Article with its join targets and tags attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleWithDetails {
    #[serde(flatten)]
    pub article: Article,
    pub author: Author,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ArticleWithDetails {
    pub fn id(&self) -> ArticleId {
        self.article.id
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}

/// Create payload for an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    /// Defaults to "now" when omitted from a JSON payload.
    #[serde(default = "default_published_at")]
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: AuthorId,
        category_id: CategoryId,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            published_at: default_published_at(),
            author_id,
            category_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}

/// Partial update for an article. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl ArticleUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.title.as_deref() {
            Some(title) => require_text("title", title),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category_id.is_none()
            && self.published_at.is_none()
    }
}

/// Replacement tag set for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleTagsUpdate {
    pub tag_ids: Vec<TagId>,
}

fn default_published_at() -> Option<DateTime<Utc>> {
    Some(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_article_rejects_blank_title() {
        let article = NewArticle::new("   ", "body", Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(
            article.validate(),
            Err(ValidationError::BlankField("title"))
        );
    }

    #[test]
    fn detailed_article_serializes_flat_with_nested_targets() {
        let author = Author {
            id: Uuid::new_v4(),
            name: "Dr. Ada Lovelace".to_string(),
            bio: None,
        };
        let category = Category {
            id: Uuid::new_v4(),
            name: "Machine Learning".to_string(),
            description: None,
        };
        let details = ArticleWithDetails {
            article: Article {
                id: Uuid::new_v4(),
                title: "t".to_string(),
                content: "c".to_string(),
                published_at: None,
                author_id: author.id,
                category_id: category.id,
            },
            author,
            category,
            tags: Vec::new(),
        };

        let json = serde_json::to_value(&details).expect("serialize");
        for key in [
            "id",
            "title",
            "content",
            "published_at",
            "author_id",
            "category_id",
            "author",
            "category",
            "tags",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert!(json["published_at"].is_null());
        assert!(json.get("seq").is_none());

        let back: ArticleWithDetails = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, details);
    }
}
