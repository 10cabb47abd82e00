//! Authentication service layer
//!
//! Login, token issuance and account registration against the account
//! store. Login failures come back as 400 "Invalid credentials" without
//! saying whether the name or the password was wrong.

use super::jwt::{self, JwtConfig};
use super::password::{hash_password, verify_password};
use super::policy::Role;
use crate::error::AppError;
use crate::store::{AccountStore, RoleStore};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

/// Account registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    #[validate(length(min = 1, max = 50))]
    pub account_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Account as returned by the API (no password material)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: i64,
    pub account_name: String,
    pub email: String,
    pub role_name: Option<String>,
}

impl From<orchid_core::Account> for AccountResponse {
    fn from(account: orchid_core::Account) -> Self {
        Self {
            account_id: account.account_id,
            account_name: account.account_name,
            email: account.email,
            role_name: account.role_name,
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountStore,
    roles: RoleStore,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(db: PgPool, jwt: JwtConfig) -> Self {
        Self {
            accounts: AccountStore::new(db.clone()),
            roles: RoleStore::new(db),
            jwt,
        }
    }

    /// Issue a token for an existing account
    ///
    /// The role claim mirrors the account's role and is emitted as absent
    /// when the account has none; such a token still authenticates but
    /// authorizes nothing above the base requirement.
    pub async fn issue_token(&self, subject: &str) -> Result<String, AppError> {
        let account = self
            .accounts
            .find_by_name(subject)
            .await?
            .ok_or_else(|| AppError::NotFound("Account".to_string()))?;

        let token = jwt::sign(&self.jwt, &account.account_name, account.role_name.as_deref())
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))?;

        Ok(token)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::BadRequest("Invalid credentials".to_string());

        let account = self
            .accounts
            .find_by_name(&request.username)
            .await?
            .ok_or_else(invalid)?;

        let password_valid = verify_password(&request.password, &account.password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))?;

        if !password_valid {
            tracing::debug!(account = %request.username, "login rejected");
            return Err(invalid());
        }

        let token = jwt::sign(&self.jwt, &account.account_name, account.role_name.as_deref())
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))?;

        tracing::info!(account = %account.account_name, "login succeeded");
        Ok(AuthResponse { token })
    }

    /// Register a new account with the given role
    pub async fn register(
        &self,
        request: AccountRequest,
        role: Role,
    ) -> Result<AccountResponse, AppError> {
        if self
            .accounts
            .name_or_email_taken(&request.account_name, &request.email)
            .await?
        {
            return Err(AppError::BadRequest(
                "Account name or email already registered".to_string(),
            ));
        }

        let role_row = self
            .roles
            .find_by_name(role.as_str())
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Role {} not found", role.as_str())))?;

        let password_hash = hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?;

        let account = self
            .accounts
            .create(
                &request.account_name,
                &request.email,
                &password_hash,
                Some(role_row.role_id),
            )
            .await?;

        tracing::info!(account = %account.account_name, role = role.as_str(), "account registered");
        Ok(account.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_request_validation() {
        let valid = AccountRequest {
            account_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = AccountRequest {
            password: "abc".to_string(),
            ..valid.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_email = AccountRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_name = AccountRequest {
            account_name: String::new(),
            ..valid
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_account_request_wire_format() {
        let json = r#"{"accountName":"bob","email":"bob@example.com","password":"secret1"}"#;
        let request: AccountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.account_name, "bob");
    }

    #[test]
    fn test_account_response_wire_format() {
        let response = AccountResponse {
            account_id: 7,
            account_name: "bob".to_string(),
            email: "bob@example.com".to_string(),
            role_name: Some("ROLE_USER".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"accountId\":7"));
        assert!(json.contains("\"roleName\":\"ROLE_USER\""));
        assert!(!json.contains("password"));
    }
}
