//! Food catalog - persisted brands and foods.
//!
//! Every write goes through `store_food`, which enforces the two duplicate
//! rules (same product id, or same name and brand) inside one transaction.
//! Foods without a brand only collide on product id.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Trait for food catalog storage.
pub trait FoodCatalog: Send + Sync {
    /// Get a brand id by name, creating the brand if it is new.
    fn get_or_create_brand(&self, name: &str) -> Result<i64, CatalogError>;

    /// Store a food unless it duplicates an existing one.
    ///
    /// Runs in its own transaction; on error nothing is written.
    fn store_food(&self, food: &NewFood) -> Result<StoreOutcome, CatalogError>;

    /// Check if a food with this product id exists.
    fn exists_by_product_id(&self, product_id: &str) -> Result<bool, CatalogError>;

    /// Check if a food with this name and brand exists.
    ///
    /// Always false for a food without a brand.
    fn exists_by_name_brand(&self, name: &str, brand: Option<&str>) -> Result<bool, CatalogError>;

    /// Get catalog statistics.
    fn stats(&self) -> Result<CatalogStats, CatalogError>;

    /// Most recently stored foods, newest first.
    fn recent_foods(&self, limit: u32) -> Result<Vec<StoredFood>, CatalogError>;

    /// Delete all foods, keeping brands. Returns the number removed.
    fn clear_foods(&self) -> Result<u64, CatalogError>;

    /// Drop and recreate every table.
    fn reset(&self) -> Result<(), CatalogError>;
}
