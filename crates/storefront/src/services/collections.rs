//! Owner collection management.

use briklyst_core::{CollectionId, StorefrontId, UserId};

use super::settings::flatten;
use crate::db::{CollectionStore, StorefrontStore};
use crate::error::{AppError, Result};
use crate::models::{Collection, CollectionInput};

pub struct CollectionService<S, C> {
    storefronts: S,
    collections: C,
}

impl<S: StorefrontStore, C: CollectionStore> CollectionService<S, C> {
    #[must_use]
    pub const fn new(storefronts: S, collections: C) -> Self {
        Self {
            storefronts,
            collections,
        }
    }

    async fn storefront_id(&self, user_id: UserId) -> Result<StorefrontId> {
        Ok(self.storefronts.ensure(user_id, flatten).await?.id)
    }

    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Collection>> {
        let storefront_id = self.storefront_id(user_id).await?;
        Ok(self.collections.list(storefront_id).await?)
    }

    /// # Errors
    ///
    /// Returns `AppError::Validation` for a bad name or description.
    pub async fn create(&self, user_id: UserId, input: CollectionInput) -> Result<Collection> {
        let input = input.validated()?;
        let storefront_id = self.storefront_id(user_id).await?;
        Ok(self.collections.create(storefront_id, &input).await?)
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the collection is not the owner's.
    pub async fn update(
        &self,
        user_id: UserId,
        id: CollectionId,
        input: CollectionInput,
    ) -> Result<Collection> {
        let input = input.validated()?;
        let storefront_id = self.storefront_id(user_id).await?;
        self.collections
            .update(storefront_id, id, &input)
            .await?
            .ok_or(AppError::NotFound("Collection"))
    }

    /// Delete a collection. Its products stay, without a collection.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the collection is not the owner's.
    pub async fn delete(&self, user_id: UserId, id: CollectionId) -> Result<()> {
        let storefront_id = self.storefront_id(user_id).await?;
        if self.collections.delete(storefront_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Collection"))
        }
    }
}
