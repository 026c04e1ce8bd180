//! Affiliate products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use briklyst_core::{CollectionId, Price, ProductId, StorefrontId};

use crate::error::AppError;

const MAX_TITLE: usize = 200;
const MAX_DESCRIPTION: usize = 5000;
const MAX_URL: usize = 2048;

/// A product as stored, including owner-only fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub storefront_id: StorefrontId,
    pub collection_id: Option<CollectionId>,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "Decimal")]
    pub price: Price,
    pub image_url: Option<String>,
    pub affiliate_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The shape visitors see. Outbound links go through the click tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProduct {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
    pub link: String,
    pub clicks: i64,
}

impl From<Product> for PublicProduct {
    fn from(p: Product) -> Self {
        Self {
            link: format!("/go/{}", p.id),
            id: p.id,
            title: p.title,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            clicks: p.clicks,
        }
    }
}

/// Create/update payload for a product.
///
/// `price` accepts a JSON number or a string such as `"$19.99"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: serde_json::Value,
    #[serde(default)]
    pub image_url: Option<String>,
    pub affiliate_url: String,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,
}

/// A product input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
    pub affiliate_url: String,
    pub collection_id: Option<CollectionId>,
}

impl ProductInput {
    /// Validate and normalize.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first bad field.
    pub fn validate(self) -> Result<NewProduct, AppError> {
        let invalid = |field: &str| AppError::Validation(format!("Invalid value for {field}"));

        let title = self.title.trim().to_string();
        if title.is_empty() || title.chars().count() > MAX_TITLE {
            return Err(invalid("title"));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION)
        {
            return Err(invalid("description"));
        }

        let price = match &self.price {
            serde_json::Value::String(s) => Price::parse(s),
            serde_json::Value::Number(n) => Price::parse(&n.to_string()),
            _ => return Err(invalid("price")),
        }
        .map_err(|_| invalid("price"))?;

        let affiliate_url = self.affiliate_url.trim().to_string();
        if !is_http_url(&affiliate_url) {
            return Err(invalid("affiliateUrl"));
        }

        let image_url = self
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if image_url.as_deref().is_some_and(|u| !is_http_url(u)) {
            return Err(invalid("imageUrl"));
        }

        Ok(NewProduct {
            title,
            description,
            price,
            image_url,
            affiliate_url,
            collection_id: self.collection_id,
        })
    }
}

fn is_http_url(value: &str) -> bool {
    value.len() <= MAX_URL
        && url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}
