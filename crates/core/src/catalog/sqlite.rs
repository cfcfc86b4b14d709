//! SQLite-backed food catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{CatalogError, CatalogStats, FoodCatalog, NewFood, StoreOutcome, StoredFood};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS brands (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        country TEXT,
        official_url TEXT,
        description TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS foods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        brand_id INTEGER REFERENCES brands(id),
        category TEXT NOT NULL,
        age_class TEXT NOT NULL,
        type_tag TEXT,
        size TEXT,
        shop_category TEXT,
        min_price REAL,
        max_price REAL,
        link TEXT,
        image TEXT,
        product_id TEXT UNIQUE,
        manufacturer TEXT,
        mall_name TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_foods_name_brand ON foods(name, brand_id);
"#;

/// SQLite-backed food catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog database and its tables.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::Database(e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn.lock().map_err(|_| CatalogError::LockPoisoned)
    }

    fn brand_id(conn: &Connection, name: &str) -> Result<i64, CatalogError> {
        conn.execute(
            "INSERT OR IGNORE INTO brands (name, created_at) VALUES (?, ?)",
            params![name, Utc::now().to_rfc3339()],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        conn.query_row(
            "SELECT id FROM brands WHERE name = ?",
            params![name],
            |row| row.get(0),
        )
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn product_id_exists(conn: &Connection, product_id: &str) -> Result<bool, CatalogError> {
        conn.query_row(
            "SELECT 1 FROM foods WHERE product_id = ?",
            params![product_id],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn name_brand_exists(
        conn: &Connection,
        name: &str,
        brand_id: i64,
    ) -> Result<bool, CatalogError> {
        conn.query_row(
            "SELECT 1 FROM foods WHERE name = ? AND brand_id = ?",
            params![name, brand_id],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn count(conn: &Connection, sql: &str) -> Result<u64, CatalogError> {
        conn.query_row(sql, [], |row| row.get::<_, i64>(0))
            .map(|n| n.max(0) as u64)
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn row_to_stored_food(row: &rusqlite::Row) -> rusqlite::Result<StoredFood> {
        let created_at_str: String = row.get(9)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(StoredFood {
            id: row.get(0)?,
            name: row.get(1)?,
            brand: row.get(2)?,
            category: row.get(3)?,
            age_class: row.get(4)?,
            type_tag: row.get(5)?,
            size: row.get(6)?,
            min_price: row.get(7)?,
            product_id: row.get(8)?,
            created_at,
        })
    }
}

impl FoodCatalog for SqliteCatalog {
    fn get_or_create_brand(&self, name: &str) -> Result<i64, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation("brand name is empty".to_string()));
        }
        let conn = self.lock()?;
        Self::brand_id(&conn, name)
    }

    fn store_food(&self, food: &NewFood) -> Result<StoreOutcome, CatalogError> {
        let food = food.clone().validated()?;
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        if let Some(product_id) = food.product_id.as_deref() {
            if Self::product_id_exists(&tx, product_id)? {
                debug!(product_id = product_id, "Skipping food with known product id");
                return Ok(StoreOutcome::DuplicateProductId);
            }
        }

        let brand_id = match food.brand.as_deref() {
            Some(brand) => Some(Self::brand_id(&tx, brand)?),
            None => None,
        };

        // Brandless foods are told apart by product id only
        if let Some(brand_id) = brand_id {
            if Self::name_brand_exists(&tx, &food.name, brand_id)? {
                debug!(name = %food.name, brand = ?food.brand, "Skipping food with known name and brand");
                return Ok(StoreOutcome::DuplicateNameBrand);
            }
        }

        let now_str = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO foods (name, brand_id, category, age_class, type_tag, size, shop_category,
                                min_price, max_price, link, image, product_id, manufacturer,
                                mall_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &food.name,
                brand_id,
                food.category.as_str(),
                food.age_class.as_str(),
                food.type_tag.map(|t| t.as_str()),
                &food.size,
                &food.shop_category,
                food.min_price,
                food.max_price,
                &food.link,
                &food.image,
                &food.product_id,
                &food.manufacturer,
                &food.mall_name,
                &now_str,
                &now_str,
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;
        let id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(StoreOutcome::Inserted(id))
    }

    fn exists_by_product_id(&self, product_id: &str) -> Result<bool, CatalogError> {
        let conn = self.lock()?;
        Self::product_id_exists(&conn, product_id.trim())
    }

    fn exists_by_name_brand(&self, name: &str, brand: Option<&str>) -> Result<bool, CatalogError> {
        let conn = self.lock()?;
        let Some(brand) = brand.map(str::trim).filter(|b| !b.is_empty()) else {
            return Ok(false);
        };
        let brand_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM brands WHERE name = ?",
                params![brand],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        // Unknown brand: no food can reference it
        match brand_id {
            Some(id) => Self::name_brand_exists(&conn, name.trim(), id),
            None => Ok(false),
        }
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let conn = self.lock()?;

        let total_brands = Self::count(&conn, "SELECT COUNT(*) FROM brands")?;
        let total_foods = Self::count(&conn, "SELECT COUNT(*) FROM foods")?;
        let with_product_id =
            Self::count(&conn, "SELECT COUNT(product_id) FROM foods")?;
        let distinct_product_ids =
            Self::count(&conn, "SELECT COUNT(DISTINCT product_id) FROM foods")?;

        Ok(CatalogStats {
            total_brands,
            total_foods,
            distinct_product_ids,
            foods_without_product_id: total_foods - with_product_id,
            potential_duplicates: with_product_id - distinct_product_ids,
        })
    }

    fn recent_foods(&self, limit: u32) -> Result<Vec<StoredFood>, CatalogError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT f.id, f.name, b.name, f.category, f.age_class, f.type_tag, f.size,
                        f.min_price, f.product_id, f.created_at
                 FROM foods f
                 LEFT JOIN brands b ON f.brand_id = b.id
                 ORDER BY f.id DESC
                 LIMIT ?",
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64], Self::row_to_stored_food)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut foods = Vec::new();
        for row in rows {
            foods.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(foods)
    }

    fn clear_foods(&self) -> Result<u64, CatalogError> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM foods", [])
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(removed as u64)
    }

    fn reset(&self) -> Result<(), CatalogError> {
        let conn = self.lock()?;
        conn.execute_batch("DROP TABLE IF EXISTS foods; DROP TABLE IF EXISTS brands;")
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)
    }
}
