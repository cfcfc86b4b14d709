//! Types for the food catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::{AgeClass, FoodCategory, TypeTag};

/// A food about to be written to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFood {
    /// Cleaned product name.
    pub name: String,
    /// Brand name; resolved to a brand row on write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Physical form (dry, wet, ...).
    pub category: FoodCategory,
    pub age_class: AgeClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<TypeTag>,
    /// Package size as written in the title, e.g. `5.4kg`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Canonical shop category of the listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// External product id; unique when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mall_name: Option<String>,
}

impl NewFood {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: None,
            category: FoodCategory::default(),
            age_class: AgeClass::default(),
            type_tag: None,
            size: None,
            shop_category: None,
            min_price: None,
            max_price: None,
            link: None,
            image: None,
            product_id: None,
            manufacturer: None,
            mall_name: None,
        }
    }

    /// Check and clean the record before it is written.
    ///
    /// A blank name is rejected. Non-positive prices are dropped rather
    /// than rejected, and blank optional strings become absent.
    pub fn validated(mut self) -> Result<Self, CatalogError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CatalogError::Validation("food name is empty".to_string()));
        }

        self.min_price = self.min_price.filter(|p| *p > 0.0);
        self.max_price = self.max_price.filter(|p| *p > 0.0);

        for field in [
            &mut self.brand,
            &mut self.size,
            &mut self.shop_category,
            &mut self.link,
            &mut self.image,
            &mut self.product_id,
            &mut self.manufacturer,
            &mut self.mall_name,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }

        Ok(self)
    }
}

/// Result of a store attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "id")]
pub enum StoreOutcome {
    /// A new row was written with this id.
    Inserted(i64),
    /// A food with the same product id already exists.
    DuplicateProductId,
    /// A food with the same name and brand already exists.
    DuplicateNameBrand,
}

impl StoreOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, StoreOutcome::Inserted(_))
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            StoreOutcome::Inserted(_) => "inserted",
            StoreOutcome::DuplicateProductId => "duplicate_id",
            StoreOutcome::DuplicateNameBrand => "duplicate_name_brand",
        }
    }
}

/// A food row read back from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFood {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub category: String,
    pub age_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Catalog statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_brands: u64,
    pub total_foods: u64,
    /// Distinct non-null product ids.
    pub distinct_product_ids: u64,
    pub foods_without_product_id: u64,
    /// Foods carrying an id minus distinct ids.
    pub potential_duplicates: u64,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Catalog lock poisoned")]
    LockPoisoned,
}
