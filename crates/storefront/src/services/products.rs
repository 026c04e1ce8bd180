//! Owner product management, including bulk import.

use serde::Serialize;

use briklyst_core::{ProductId, StorefrontId, UserId};

use super::settings::flatten;
use crate::db::{CollectionStore, ProductStore, StorefrontStore};
use crate::error::{AppError, Result};
use crate::models::product::NewProduct;
use crate::models::{Product, ProductInput};

/// Rows accepted by one import call.
pub const MAX_IMPORT_ROWS: usize = 500;

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub failed: Vec<ImportFailure>,
}

/// One rejected import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub index: usize,
    pub error: String,
}

pub struct ProductService<S, P, C> {
    storefronts: S,
    products: P,
    collections: C,
}

impl<S, P, C> ProductService<S, P, C>
where
    S: StorefrontStore,
    P: ProductStore,
    C: CollectionStore,
{
    #[must_use]
    pub const fn new(storefronts: S, products: P, collections: C) -> Self {
        Self {
            storefronts,
            products,
            collections,
        }
    }

    async fn storefront_id(&self, user_id: UserId) -> Result<StorefrontId> {
        Ok(self.storefronts.ensure(user_id, flatten).await?.id)
    }

    /// Collections are checked against the owner's storefront.
    async fn check_collection(&self, storefront_id: StorefrontId, product: &NewProduct) -> Result<()> {
        if let Some(collection_id) = product.collection_id
            && !self.collections.exists(storefront_id, collection_id).await?
        {
            return Err(AppError::NotFound("Collection"));
        }
        Ok(())
    }

    /// Live products of the owner's storefront.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Product>> {
        let storefront_id = self.storefront_id(user_id).await?;
        Ok(self.products.list(storefront_id).await?)
    }

    /// # Errors
    ///
    /// Returns `AppError::Validation` for bad input and `AppError::NotFound`
    /// for a collection outside the owner's storefront.
    #[tracing::instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn create(&self, user_id: UserId, input: ProductInput) -> Result<Product> {
        let product = input.validate()?;
        let storefront_id = self.storefront_id(user_id).await?;
        self.check_collection(storefront_id, &product).await?;
        let created = self.products.create(storefront_id, &product).await?;
        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the product is not the owner's.
    pub async fn update(&self, user_id: UserId, id: ProductId, input: ProductInput) -> Result<Product> {
        let product = input.validate()?;
        let storefront_id = self.storefront_id(user_id).await?;
        self.check_collection(storefront_id, &product).await?;
        self.products
            .update(storefront_id, id, &product)
            .await?
            .ok_or(AppError::NotFound("Product"))
    }

    /// Soft-delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the product is not the owner's.
    pub async fn delete(&self, user_id: UserId, id: ProductId) -> Result<()> {
        let storefront_id = self.storefront_id(user_id).await?;
        if self.products.soft_delete(storefront_id, id).await? {
            tracing::info!(product_id = %id, "Product deleted");
            Ok(())
        } else {
            Err(AppError::NotFound("Product"))
        }
    }

    /// Create many products. A bad row is reported and skipped; the rest
    /// are still created.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when there are too many rows, and
    /// `AppError::Database` if storage fails outright.
    #[tracing::instrument(skip(self, rows), fields(user_id = %user_id, rows = rows.len()))]
    pub async fn import(&self, user_id: UserId, rows: Vec<serde_json::Value>) -> Result<ImportReport> {
        if rows.len() > MAX_IMPORT_ROWS {
            return Err(AppError::Validation(format!(
                "Too many rows (max {MAX_IMPORT_ROWS})"
            )));
        }
        let storefront_id = self.storefront_id(user_id).await?;
        let mut report = ImportReport::default();

        for (index, row) in rows.into_iter().enumerate() {
            match self.import_row(storefront_id, row).await {
                Ok(_) => report.created += 1,
                Err(err @ (AppError::Validation(_) | AppError::NotFound(_))) => {
                    report.failed.push(ImportFailure {
                        index,
                        error: err.to_string(),
                    });
                }
                Err(other) => return Err(other),
            }
        }

        tracing::info!(
            created = report.created,
            failed = report.failed.len(),
            "Product import finished"
        );
        Ok(report)
    }

    async fn import_row(&self, storefront_id: StorefrontId, row: serde_json::Value) -> Result<Product> {
        let input: ProductInput = serde_json::from_value(row)
            .map_err(|_| AppError::Validation("Invalid product row".to_string()))?;
        let product = input.validate()?;
        self.check_collection(storefront_id, &product).await?;
        Ok(self.products.create(storefront_id, &product).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::CollectionInput;

    fn service(store: &MemoryStore) -> ProductService<MemoryStore, MemoryStore, MemoryStore> {
        ProductService::new(store.clone(), store.clone(), store.clone())
    }

    fn input(title: &str) -> ProductInput {
        serde_json::from_value(json!({
            "title": title,
            "price": 19.99,
            "affiliateUrl": "https://shop.example.com/item"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let service = service(&store);
        let first = service.create(owner.id, input("First")).await.unwrap();
        let second = service.create(owner.id, input("Second")).await.unwrap();

        let listed = service.list(owner.id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_product() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let intruder = store.seed_user("intruder@example.com", "other");
        let service = service(&store);
        let product = service.create(owner.id, input("Mine")).await.unwrap();

        let err = service
            .update(intruder.id, product.id, input("Hijacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));
        let err = service.delete(intruder.id, product.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));

        let listed = service.list(owner.id).await.unwrap();
        assert_eq!(listed.first().unwrap().title, "Mine");
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let service = service(&store);
        let product = service.create(owner.id, input("Gone")).await.unwrap();
        service.delete(owner.id, product.id).await.unwrap();

        assert!(service.list(owner.id).await.unwrap().is_empty());
        let stored = store.all_products();
        assert!(stored.first().unwrap().deleted_at.is_some());

        let err = service.delete(owner.id, product.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_collection_rejected() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let other = store.seed_user("other@example.com", "other");
        let other_storefront = StorefrontStore::ensure(&store, other.id, flatten).await.unwrap();
        let foreign = CollectionStore::create(
            &store,
            other_storefront.id,
            &CollectionInput {
                name: "Theirs".to_string(),
                description: None,
                position: 0,
            },
        )
        .await
        .unwrap();

        let mut with_collection = input("Mug");
        with_collection.collection_id = Some(foreign.id);
        let err = service(&store)
            .create(owner.id, with_collection)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Collection")));
    }

    #[tokio::test]
    async fn test_import_isolates_bad_rows() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let rows = vec![
            json!({"title": "Good", "price": "5", "affiliateUrl": "https://shop.example.com/a"}),
            json!({"title": "No link", "price": "5"}),
            json!({"title": "Bad price", "price": "free", "affiliateUrl": "https://shop.example.com/b"}),
            json!({"title": "Also good", "price": 7, "affiliateUrl": "https://shop.example.com/c"}),
        ];

        let report = service(&store).import(owner.id, rows).await.unwrap();
        assert_eq!(report.created, 2);
        let failed: Vec<usize> = report.failed.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![1, 2]);
        assert_eq!(
            report.failed.get(1).unwrap().error,
            "Invalid value for price"
        );
    }

    #[tokio::test]
    async fn test_import_row_limit() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let rows = vec![json!({}); MAX_IMPORT_ROWS + 1];
        let err = service(&store).import(owner.id, rows).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
