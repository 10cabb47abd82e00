//! Orchid repository
//!
//! Same soft-delete scheme as categories.

use orchid_core::{Orchid, Result, STATUS_ACTIVE, STATUS_DELETED};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::db_err;

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrchidRow {
    orchid_id: i64,
    orchid_name: String,
    orchid_description: String,
    orchid_url: Option<String>,
    price: Decimal,
    is_natural: bool,
    status: String,
    category_id: Option<i64>,
}

impl From<OrchidRow> for Orchid {
    fn from(row: OrchidRow) -> Self {
        Orchid {
            orchid_id: row.orchid_id,
            orchid_name: row.orchid_name,
            orchid_description: row.orchid_description,
            orchid_url: row.orchid_url,
            price: row.price,
            is_natural: row.is_natural,
            status: row.status,
            category_id: row.category_id,
        }
    }
}

const SELECT_ORCHID: &str = "SELECT orchid_id, orchid_name, orchid_description, orchid_url, \
     price, is_natural, status, category_id FROM orchids";

/// Fields for creating or updating an orchid
#[derive(Debug, Clone)]
pub struct OrchidInput {
    pub orchid_name: String,
    pub orchid_description: String,
    pub orchid_url: Option<String>,
    pub price: Decimal,
    pub is_natural: bool,
    pub category_id: Option<i64>,
}

/// Orchid repository over Postgres
#[derive(Clone)]
pub struct OrchidStore {
    db: PgPool,
}

impl OrchidStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Orchid>> {
        let rows = sqlx::query_as::<_, OrchidRow>(&format!(
            "{SELECT_ORCHID} WHERE status = $1 ORDER BY orchid_id"
        ))
        .bind(STATUS_ACTIVE)
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Orchid::from).collect())
    }

    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Orchid>> {
        let rows = sqlx::query_as::<_, OrchidRow>(&format!(
            "{SELECT_ORCHID} WHERE status = $1 AND category_id = $2 ORDER BY orchid_id"
        ))
        .bind(STATUS_ACTIVE)
        .bind(category_id)
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Orchid::from).collect())
    }

    pub async fn find_by_id(&self, orchid_id: i64) -> Result<Option<Orchid>> {
        let row = sqlx::query_as::<_, OrchidRow>(&format!(
            "{SELECT_ORCHID} WHERE orchid_id = $1 AND status = $2"
        ))
        .bind(orchid_id)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Orchid::from))
    }

    pub async fn create(&self, input: &OrchidInput) -> Result<Orchid> {
        let row = sqlx::query_as::<_, OrchidRow>(
            "INSERT INTO orchids \
             (orchid_name, orchid_description, orchid_url, price, is_natural, status, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING orchid_id, orchid_name, orchid_description, orchid_url, \
             price, is_natural, status, category_id",
        )
        .bind(&input.orchid_name)
        .bind(&input.orchid_description)
        .bind(&input.orchid_url)
        .bind(input.price)
        .bind(input.is_natural)
        .bind(STATUS_ACTIVE)
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    pub async fn update(&self, orchid_id: i64, input: &OrchidInput) -> Result<Option<Orchid>> {
        let row = sqlx::query_as::<_, OrchidRow>(
            "UPDATE orchids SET orchid_name = $2, orchid_description = $3, orchid_url = $4, \
             price = $5, is_natural = $6, category_id = $7 \
             WHERE orchid_id = $1 AND status = $8 \
             RETURNING orchid_id, orchid_name, orchid_description, orchid_url, \
             price, is_natural, status, category_id",
        )
        .bind(orchid_id)
        .bind(&input.orchid_name)
        .bind(&input.orchid_description)
        .bind(&input.orchid_url)
        .bind(input.price)
        .bind(input.is_natural)
        .bind(input.category_id)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Orchid::from))
    }

    /// Soft delete; returns whether an active row was affected
    pub async fn delete(&self, orchid_id: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE orchids SET status = $2 WHERE orchid_id = $1 AND status = $3")
                .bind(orchid_id)
                .bind(STATUS_DELETED)
                .bind(STATUS_ACTIVE)
                .execute(&self.db)
                .await
                .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
