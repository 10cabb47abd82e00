//! Role repository

use orchid_core::{Result, Role};
use sqlx::PgPool;

use super::db_err;

#[derive(Debug, Clone, sqlx::FromRow)]
struct RoleRow {
    role_id: i64,
    role_name: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            role_id: row.role_id,
            role_name: row.role_name,
        }
    }
}

/// Role repository over Postgres
#[derive(Clone)]
pub struct RoleStore {
    db: PgPool,
}

impl RoleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name FROM roles ORDER BY role_id",
        )
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub async fn find_by_id(&self, role_id: i64) -> Result<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name FROM roles WHERE role_id = $1",
        )
        .bind(role_id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Role::from))
    }

    pub async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name FROM roles WHERE role_name = $1",
        )
        .bind(role_name)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Role::from))
    }

    pub async fn create(&self, role_name: &str) -> Result<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO roles (role_name) VALUES ($1) RETURNING role_id, role_name",
        )
        .bind(role_name)
        .fetch_one(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    pub async fn update(&self, role_id: i64, role_name: &str) -> Result<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "UPDATE roles SET role_name = $2 WHERE role_id = $1 RETURNING role_id, role_name",
        )
        .bind(role_id)
        .bind(role_name)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Role::from))
    }

    /// Returns whether a row was deleted
    pub async fn delete(&self, role_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE role_id = $1")
            .bind(role_id)
            .execute(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
