//! Schema bootstrap and initial data
//!
//! Creates the tables if missing and seeds the two roles plus a default
//! admin and user account on an empty database. Seed passwords are
//! argon2-hashed like any registered account's.

use orchid_core::Result;
use sqlx::PgPool;

use super::db_err;
use crate::auth::password::hash_password;
use crate::auth::policy::Role;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS roles (
    role_id BIGSERIAL PRIMARY KEY,
    role_name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS accounts (
    account_id BIGSERIAL PRIMARY KEY,
    account_name TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role_id BIGINT REFERENCES roles(role_id)
);
CREATE TABLE IF NOT EXISTS categories (
    category_id BIGSERIAL PRIMARY KEY,
    category_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE'
);
CREATE TABLE IF NOT EXISTS orchids (
    orchid_id BIGSERIAL PRIMARY KEY,
    orchid_name TEXT NOT NULL,
    orchid_description TEXT NOT NULL,
    orchid_url TEXT,
    price NUMERIC NOT NULL,
    is_natural BOOLEAN NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    category_id BIGINT REFERENCES categories(category_id)
);
CREATE TABLE IF NOT EXISTS orders (
    order_id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL REFERENCES accounts(account_id),
    order_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    order_status TEXT NOT NULL DEFAULT 'NEW',
    total_amount NUMERIC NOT NULL
);
CREATE TABLE IF NOT EXISTS order_details (
    id BIGSERIAL PRIMARY KEY,
    order_id BIGINT NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
    orchid_id BIGINT NOT NULL REFERENCES orchids(orchid_id),
    quantity INT NOT NULL,
    price NUMERIC NOT NULL
);";

/// Create the schema and seed roles/accounts on first run
pub async fn run(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(db_err)?;
    }

    ensure_role(pool, Role::Admin.as_str()).await?;
    ensure_role(pool, Role::User.as_str()).await?;

    ensure_account(pool, "admin", "admin@orchid.shop", Role::Admin.as_str()).await?;
    ensure_account(pool, "user", "user@orchid.shop", Role::User.as_str()).await?;

    tracing::info!("database schema and seed data in place");
    Ok(())
}

async fn ensure_role(pool: &PgPool, role_name: &str) -> Result<()> {
    sqlx::query("INSERT INTO roles (role_name) VALUES ($1) ON CONFLICT (role_name) DO NOTHING")
        .bind(role_name)
        .execute(pool)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn ensure_account(
    pool: &PgPool,
    account_name: &str,
    email: &str,
    role_name: &str,
) -> Result<()> {
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM accounts WHERE account_name = $1",
    )
    .bind(account_name)
    .fetch_one(pool)
    .await
    .map_err(db_err)?;

    if exists > 0 {
        return Ok(());
    }

    // Default dev credentials, hashed the same way registration hashes
    let password_hash = hash_password("@1")
        .map_err(|e| orchid_core::OrchidError::Config(format!("seed password hash: {e}")))?;

    sqlx::query(
        "INSERT INTO accounts (account_name, email, password_hash, role_id) \
         VALUES ($1, $2, $3, (SELECT role_id FROM roles WHERE role_name = $4))",
    )
    .bind(account_name)
    .bind(email)
    .bind(&password_hash)
    .bind(role_name)
    .execute(pool)
    .await
    .map_err(db_err)?;

    tracing::info!(account = account_name, role = role_name, "seeded account");
    Ok(())
}
