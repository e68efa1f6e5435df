//! Author, category and tag records.
//!
//! These are the join targets of an article. Category and tag names are
//! unique and compared case-sensitively.

use super::article::Article;
use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AuthorId = Uuid;
pub type CategoryId = Uuid;
pub type TagId = Uuid;

/// Article author, as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub bio: Option<String>,
}

/// Article category, as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Article tag, as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

impl NewAuthor {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl AuthorUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name.as_deref() {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }
}

/// Create payload shared by categories and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLabel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewLabel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// Partial update payload shared by categories and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LabelUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name.as_deref() {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }
}

/// Author detail view with the author's articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWithArticles {
    #[serde(flatten)]
    pub author: Author,
    pub articles: Vec<Article>,
}

/// Tag detail view with the articles carrying the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagWithArticles {
    #[serde(flatten)]
    pub tag: Tag,
    pub articles: Vec<Article>,
}
