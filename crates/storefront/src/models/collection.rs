//! Product collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use briklyst_core::{CollectionId, StorefrontId};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub storefront_id: StorefrontId,
    pub name: String,
    pub description: Option<String>,
    /// Display position, ascending.
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Create/update payload for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: i32,
}

impl CollectionInput {
    /// Trim and check the input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the offending field.
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() || self.name.chars().count() > 120 {
            return Err(AppError::Validation("Invalid value for name".to_string()));
        }
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > 2000)
        {
            return Err(AppError::Validation(
                "Invalid value for description".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_input_trims() {
        let input = CollectionInput {
            name: "  Summer picks ".to_string(),
            description: Some("   ".to_string()),
            position: 2,
        }
        .validated()
        .unwrap();
        assert_eq!(input.name, "Summer picks");
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_collection_input_requires_name() {
        let result = CollectionInput {
            name: " ".to_string(),
            description: None,
            position: 0,
        }
        .validated();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
