//! Orchid Core - domain models and shared types
//!
//! Domain entities for the orchid shop (accounts, roles, categories,
//! orchids, orders) plus the shared error type and configuration.

pub mod config;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error type shared across crates
#[derive(Debug, Error)]
pub enum OrchidError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using OrchidError
pub type Result<T> = std::result::Result<T, OrchidError>;

/// Entity status for soft deletion
pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_DELETED: &str = "DELETED";

/// Initial status for newly placed orders
pub const ORDER_STATUS_NEW: &str = "NEW";

/// A shop account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    /// Unique login name
    pub account_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Assigned role, absent for accounts created without one
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
}

/// An authorization role (`ROLE_ADMIN`, `ROLE_USER`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i64,
    pub role_name: String,
}

/// A product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub status: String,
}

impl Category {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// An orchid listed in the shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orchid {
    pub orchid_id: i64,
    pub orchid_name: String,
    pub orchid_description: String,
    /// Opaque image URL, no upload handling here
    pub orchid_url: Option<String>,
    pub price: Decimal,
    pub is_natural: bool,
    pub status: String,
    pub category_id: Option<i64>,
}

/// A placed order with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub account_id: i64,
    /// Owning account's login name, used for the ownership check
    pub account_name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: String,
    pub total_amount: Decimal,
    pub details: Vec<OrderDetail>,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub orchid_id: i64,
    pub orchid_name: String,
    pub orchid_url: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderDetail {
    /// Line total (unit price times quantity)
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let account = Account {
            account_id: 1,
            account_name: "admin".to_string(),
            email: "admin@orchid.shop".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role_id: Some(1),
            role_name: Some("ROLE_ADMIN".to_string()),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("admin@orchid.shop"));
    }

    #[test]
    fn test_category_is_active() {
        let active = Category {
            category_id: 1,
            category_name: "Phalaenopsis".to_string(),
            status: STATUS_ACTIVE.to_string(),
        };
        let deleted = Category {
            status: STATUS_DELETED.to_string(),
            ..active.clone()
        };

        assert!(active.is_active());
        assert!(!deleted.is_active());
    }

    #[test]
    fn test_order_detail_line_total() {
        let detail = OrderDetail {
            id: 1,
            orchid_id: 7,
            orchid_name: "Cattleya".to_string(),
            orchid_url: None,
            quantity: 3,
            price: Decimal::new(1950, 2), // 19.50
        };

        assert_eq!(detail.line_total(), Decimal::new(5850, 2));
    }

    #[test]
    fn test_error_display() {
        let err = OrchidError::NotFound("Order 42".to_string());
        assert_eq!(err.to_string(), "Not found: Order 42");

        let err = OrchidError::AccessDenied {
            reason: "admin only".to_string(),
        };
        assert!(err.to_string().contains("admin only"));
    }
}
