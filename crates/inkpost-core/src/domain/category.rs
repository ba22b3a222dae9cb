use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identified, validate_name};
use crate::error::DomainError;

/// Category entity - every post belongs to exactly one.
///
/// Deleting a category deletes all of its posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name("Category", &name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
        })
    }
}

impl Identified for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}
