//! Domain entities - the core business objects.

mod author;
mod category;
mod post;
mod tag;

pub use author::Author;
pub use category::Category;
pub use post::{Post, StampedPost, TITLE_MAX_LENGTH};
pub use tag::Tag;

use uuid::Uuid;

use crate::error::DomainError;

/// Maximum length of category and tag names.
pub const NAME_MAX_LENGTH: usize = 100;

/// Entities addressed by a UUID primary key.
pub trait Identified {
    fn id(&self) -> Uuid;
}

pub(crate) fn validate_name(kind: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(format!("{kind} name is required")));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(DomainError::Validation(format!(
            "{kind} name exceeds {NAME_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}
