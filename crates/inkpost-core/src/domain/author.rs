use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identified;
use crate::error::DomainError;

/// Author entity - the user identity a post is written by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Author {
    /// Create a new author with generated ID and timestamp.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Result<Self, DomainError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(DomainError::Validation("Username is required".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email: email.into(),
            created_at: Utc::now(),
        })
    }
}

impl Identified for Author {
    fn id(&self) -> Uuid {
        self.id
    }
}
