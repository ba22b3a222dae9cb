use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identified, validate_name};
use crate::error::DomainError;

/// Tag entity - many-to-many with posts.
///
/// Deleting a tag only detaches it from its posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name("Tag", &name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
        })
    }
}

impl Identified for Tag {
    fn id(&self) -> Uuid {
        self.id
    }
}
