//! sqlx/Postgres store layer
//!
//! One narrow repository per entity. Queries use `query_as` with private
//! `FromRow` record structs and `$n` binds; failures map into
//! [`orchid_core::OrchidError`].

pub mod accounts;
pub mod categories;
pub mod orchids;
pub mod orders;
pub mod roles;
pub mod seed;

pub use accounts::AccountStore;
pub use categories::CategoryStore;
pub use orchids::OrchidStore;
pub use orders::OrderStore;
pub use roles::RoleStore;

use orchid_core::OrchidError;

pub(crate) fn db_err(e: sqlx::Error) -> OrchidError {
    OrchidError::Database(e.to_string())
}
