//! Category repository
//!
//! Deletion is soft: rows flip to `DELETED` and drop out of listings.

use orchid_core::{Category, Result, STATUS_ACTIVE, STATUS_DELETED};
use sqlx::PgPool;

use super::db_err;

#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryRow {
    category_id: i64,
    category_name: String,
    status: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            category_id: row.category_id,
            category_name: row.category_name,
            status: row.status,
        }
    }
}

/// Category repository over Postgres
#[derive(Clone)]
pub struct CategoryStore {
    db: PgPool,
}

impl CategoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, category_name, status FROM categories \
             WHERE status = $1 ORDER BY category_id",
        )
        .bind(STATUS_ACTIVE)
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn find_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, category_name, status FROM categories \
             WHERE category_id = $1 AND status = $2",
        )
        .bind(category_id)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Category::from))
    }

    pub async fn create(&self, category_name: &str) -> Result<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (category_name, status) VALUES ($1, $2) \
             RETURNING category_id, category_name, status",
        )
        .bind(category_name)
        .bind(STATUS_ACTIVE)
        .fetch_one(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    pub async fn update(&self, category_id: i64, category_name: &str) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "UPDATE categories SET category_name = $2 \
             WHERE category_id = $1 AND status = $3 \
             RETURNING category_id, category_name, status",
        )
        .bind(category_id)
        .bind(category_name)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Category::from))
    }

    /// Soft delete; returns whether an active row was affected
    pub async fn delete(&self, category_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE categories SET status = $2 WHERE category_id = $1 AND status = $3",
        )
        .bind(category_id)
        .bind(STATUS_DELETED)
        .bind(STATUS_ACTIVE)
        .execute(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
