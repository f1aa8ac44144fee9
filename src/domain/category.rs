//! Category
//!
//! Event categories managed by admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("image", &self.image),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }

    pub fn into_category(self) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }
}
