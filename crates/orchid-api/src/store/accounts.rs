//! Account repository

use orchid_core::{Account, Result};
use sqlx::PgPool;

use super::db_err;

#[derive(Debug, Clone, sqlx::FromRow)]
struct AccountRow {
    account_id: i64,
    account_name: String,
    email: String,
    password_hash: String,
    role_id: Option<i64>,
    role_name: Option<String>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            account_id: row.account_id,
            account_name: row.account_name,
            email: row.email,
            password_hash: row.password_hash,
            role_id: row.role_id,
            role_name: row.role_name,
        }
    }
}

const SELECT_ACCOUNT: &str = "SELECT a.account_id, a.account_name, a.email, a.password_hash, \
     a.role_id, r.role_name \
     FROM accounts a LEFT JOIN roles r ON r.role_id = a.role_id";

/// Account repository over Postgres
#[derive(Clone)]
pub struct AccountStore {
    db: PgPool,
}

impl AccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Look up an account by its unique login name
    pub async fn find_by_name(&self, account_name: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_ACCOUNT} WHERE a.account_name = $1"
        ))
        .bind(account_name)
        .fetch_optional(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map(Account::from))
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_ACCOUNT} ORDER BY a.account_id"
        ))
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Whether the login name or email is already registered
    pub async fn name_or_email_taken(&self, account_name: &str, email: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts WHERE account_name = $1 OR email = $2",
        )
        .bind(account_name)
        .bind(email)
        .fetch_one(&self.db)
        .await
        .map_err(db_err)?;

        Ok(count > 0)
    }

    pub async fn create(
        &self,
        account_name: &str,
        email: &str,
        password_hash: &str,
        role_id: Option<i64>,
    ) -> Result<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            "WITH inserted AS ( \
                INSERT INTO accounts (account_name, email, password_hash, role_id) \
                VALUES ($1, $2, $3, $4) \
                RETURNING account_id, account_name, email, password_hash, role_id \
             ) \
             SELECT i.account_id, i.account_name, i.email, i.password_hash, i.role_id, r.role_name \
             FROM inserted i LEFT JOIN roles r ON r.role_id = i.role_id",
        )
        .bind(account_name)
        .bind(email)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }
}
