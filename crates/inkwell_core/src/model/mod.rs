//! Blog domain model.
//!
//! # Responsibility
//! - Define the records stored by the article store and their wire shapes.
//! - Validate write-side inputs before they reach SQL.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - Wire shapes carry no private columns (article `seq` stays internal).

pub mod article;
pub mod catalog;

use thiserror::Error;

/// Input validation failure for write-side models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    #[error("`{0}` must not be blank")]
    BlankField(&'static str),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
