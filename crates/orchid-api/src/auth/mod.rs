//! Authentication and authorization
//!
//! Token service ([`jwt`]), password hashing ([`password`]), the central
//! access policy ([`policy`]), the bearer middleware ([`middleware`]) and
//! the login/registration service ([`service`]).

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod service;

pub use jwt::JwtConfig;
pub use middleware::{auth_middleware, AuthError, AuthenticatedUser};
pub use policy::{enforce, Operation, Role, RoleRequirement};
pub use service::{AccountRequest, AccountResponse, AuthResponse, AuthService, LoginRequest};
