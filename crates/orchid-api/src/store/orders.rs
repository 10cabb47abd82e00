//! Order repository
//!
//! Orders join the owning account's name (used for the ownership check)
//! and carry their line items.

use chrono::{DateTime, Utc};
use orchid_core::{Order, OrderDetail, Result};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::db_err;

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    order_id: i64,
    account_id: i64,
    account_name: String,
    order_date: DateTime<Utc>,
    order_status: String,
    total_amount: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderDetailRow {
    id: i64,
    orchid_id: i64,
    orchid_name: String,
    orchid_url: Option<String>,
    quantity: i32,
    price: Decimal,
}

impl From<OrderDetailRow> for OrderDetail {
    fn from(row: OrderDetailRow) -> Self {
        OrderDetail {
            id: row.id,
            orchid_id: row.orchid_id,
            orchid_name: row.orchid_name,
            orchid_url: row.orchid_url,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

impl OrderRow {
    fn into_order(self, details: Vec<OrderDetail>) -> Order {
        Order {
            order_id: self.order_id,
            account_id: self.account_id,
            account_name: self.account_name,
            order_date: self.order_date,
            order_status: self.order_status,
            total_amount: self.total_amount,
            details,
        }
    }
}

const SELECT_ORDER: &str = "SELECT o.order_id, o.account_id, a.account_name, o.order_date, \
     o.order_status, o.total_amount \
     FROM orders o JOIN accounts a ON a.account_id = o.account_id";

/// A new order with at most one line item
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub account_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub order_status: String,
    pub total_amount: Decimal,
    pub detail: Option<NewOrderDetail>,
}

#[derive(Debug, Clone)]
pub struct NewOrderDetail {
    pub orchid_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

/// Updatable order fields; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub order_date: Option<DateTime<Utc>>,
    pub order_status: Option<String>,
    pub total_amount: Option<Decimal>,
}

/// Order repository over Postgres
#[derive(Clone)]
pub struct OrderStore {
    db: PgPool,
}

impl OrderStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} ORDER BY o.order_id"))
            .fetch_all(&self.db)
            .await
            .map_err(db_err)?;

        self.attach_details(rows).await
    }

    pub async fn list_by_account_name(&self, account_name: &str) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} WHERE a.account_name = $1 ORDER BY o.order_id"
        ))
        .bind(account_name)
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        self.attach_details(rows).await
    }

    pub async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE o.order_id = $1"))
            .bind(order_id)
            .fetch_optional(&self.db)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => {
                let details = self.fetch_details(row.order_id).await?;
                Ok(Some(row.into_order(details)))
            }
            None => Ok(None),
        }
    }

    /// Insert the order and its line item atomically
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order> {
        let mut tx = self.db.begin().await.map_err(db_err)?;

        let order_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (account_id, order_date, order_status, total_amount) \
             VALUES ($1, COALESCE($2, NOW()), $3, $4) RETURNING order_id",
        )
        .bind(new_order.account_id)
        .bind(new_order.order_date)
        .bind(&new_order.order_status)
        .bind(new_order.total_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        if let Some(detail) = &new_order.detail {
            sqlx::query(
                "INSERT INTO order_details (order_id, orchid_id, quantity, price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(detail.orchid_id)
            .bind(detail.quantity)
            .bind(detail.price)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| orchid_core::OrchidError::Database("Order vanished after insert".into()))
    }

    pub async fn update(&self, order_id: i64, update: &OrderUpdate) -> Result<Option<Order>> {
        let result = sqlx::query(
            "UPDATE orders SET \
             order_date = COALESCE($2, order_date), \
             order_status = COALESCE($3, order_status), \
             total_amount = COALESCE($4, total_amount) \
             WHERE order_id = $1",
        )
        .bind(order_id)
        .bind(update.order_date)
        .bind(&update.order_status)
        .bind(update.total_amount)
        .execute(&self.db)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(order_id).await
    }

    /// Hard delete; line items go with the order via ON DELETE CASCADE
    pub async fn delete(&self, order_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_details(&self, order_id: i64) -> Result<Vec<OrderDetail>> {
        let rows = sqlx::query_as::<_, OrderDetailRow>(
            "SELECT d.id, d.orchid_id, o.orchid_name, o.orchid_url, d.quantity, d.price \
             FROM order_details d JOIN orchids o ON o.orchid_id = d.orchid_id \
             WHERE d.order_id = $1 ORDER BY d.id",
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(OrderDetail::from).collect())
    }

    async fn attach_details(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let details = self.fetch_details(row.order_id).await?;
            orders.push(row.into_order(details));
        }
        Ok(orders)
    }
}
