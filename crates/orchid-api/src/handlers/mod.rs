//! HTTP handlers
//!
//! One module per resource; request/response DTOs live beside the handlers
//! that use them. Every protected handler calls `policy::enforce` before
//! touching the store.

pub mod accounts;
pub mod categories;
pub mod health;
pub mod orchids;
pub mod orders;
pub mod roles;
