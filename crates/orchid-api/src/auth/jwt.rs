//! JWT token generation and validation
//!
//! HMAC-SHA256 signed tokens carrying the account name and role claim.
//! `verify` is a pure boolean check: malformed input, a bad signature and
//! expiry all come back as `false`, never an error.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in every issued token
///
/// `exp` is always `iat` plus the configured validity window. Claims are
/// reconstructed fresh on every decode; nothing is cached between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account name
    pub sub: String,
    /// Role name (`ROLE_ADMIN`/`ROLE_USER`), absent when the account has no role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

/// Token generation and decoding errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to decode token")]
    Decode,
}

/// JWT configuration
///
/// An explicitly constructed value injected wherever tokens are signed or
/// checked. Read-only after construction, so it can be shared freely across
/// concurrent verifications.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Token validity window in days
    pub token_validity_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-key-change-in-production".to_string(),
            token_validity_days: 10,
        }
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_validity_days: i64) -> Self {
        Self {
            secret: secret.into(),
            token_validity_days,
        }
    }

    fn validity_secs(&self) -> i64 {
        self.token_validity_days * 24 * 60 * 60
    }
}

impl From<&orchid_core::config::AuthConfig> for JwtConfig {
    fn from(auth: &orchid_core::config::AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            token_validity_days: auth.token_validity_days,
        }
    }
}

/// Sign a token for the given subject and optional role claim
pub fn sign(config: &JwtConfig, subject: &str, role: Option<&str>) -> Result<String, JwtError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        role: role.map(|r| r.to_string()),
        iat: now,
        exp: now + config.validity_secs(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Check that a token has a valid signature and has not expired
///
/// Never errors; any failure mode is `false`.
pub fn verify(config: &JwtConfig, token: &str) -> bool {
    verify_at(config, token, Utc::now().timestamp())
}

/// Verification against an explicit clock, so the expiry boundary is testable
pub(crate) fn verify_at(config: &JwtConfig, token: &str, now: i64) -> bool {
    match decode_claims(config, token) {
        // exp equal to now counts as expired
        Ok(claims) => now < claims.exp,
        Err(_) => false,
    }
}

/// Extract the subject from a token the caller has already verified
pub fn decode_subject(config: &JwtConfig, token: &str) -> Result<String, JwtError> {
    decode_claims(config, token).map(|c| c.sub)
}

/// Extract the role claim from a token the caller has already verified
pub fn decode_role(config: &JwtConfig, token: &str) -> Result<Option<String>, JwtError> {
    decode_claims(config, token).map(|c| c.role)
}

/// Decode claims with the signature checked but expiry left to the caller.
/// The library's own exp check carries a 60 s leeway, which would blur the
/// expiry boundary; `verify_at` applies the exact `exp <= now` rule instead.
fn decode_claims(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|_| JwtError::Decode)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-signing-key", 10)
    }

    #[test]
    fn test_sign_and_verify() {
        let config = test_config();
        let token = sign(&config, "admin", Some("ROLE_ADMIN")).expect("Failed to sign token");

        assert!(verify(&config, &token));
        assert_eq!(decode_subject(&config, &token).unwrap(), "admin");
        assert_eq!(
            decode_role(&config, &token).unwrap(),
            Some("ROLE_ADMIN".to_string())
        );
    }

    #[test]
    fn test_absent_role_claim_round_trips() {
        let config = test_config();
        let token = sign(&config, "norole", None).unwrap();

        assert!(verify(&config, &token));
        assert_eq!(decode_role(&config, &token).unwrap(), None);
    }

    #[test]
    fn test_malformed_token_verifies_false() {
        let config = test_config();
        assert!(!verify(&config, "not-a-token"));
        assert!(!verify(&config, ""));
        assert!(!verify(&config, "a.b.c"));
    }

    #[test]
    fn test_wrong_secret_verifies_false() {
        let config1 = JwtConfig::new("secret-one", 10);
        let config2 = JwtConfig::new("secret-two", 10);

        let token = sign(&config1, "user", Some("ROLE_USER")).unwrap();
        assert!(verify(&config1, &token));
        assert!(!verify(&config2, &token));
    }

    #[test]
    fn test_tampered_payload_verifies_false() {
        let config = test_config();
        let token = sign(&config, "user", Some("ROLE_USER")).unwrap();

        // Flip one character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
        assert_eq!(parts.len(), 3);
        let payload = &parts[1];
        let flipped: char = if payload.ends_with('A') { 'B' } else { 'A' };
        let mut tampered_payload = payload[..payload.len() - 1].to_string();
        tampered_payload.push(flipped);
        parts[1] = tampered_payload;
        let tampered = parts.join(".");

        assert!(!verify(&config, &tampered));
    }

    #[test]
    fn test_expiry_boundary() {
        let config = test_config();
        let exp = 1_700_000_000;
        let claims = Claims {
            sub: "user".to_string(),
            role: Some("ROLE_USER".to_string()),
            iat: exp - config.validity_secs(),
            exp,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        // Strictly before expiry: valid
        assert!(verify_at(&config, &token, exp - 1));
        // At the boundary: already expired
        assert!(!verify_at(&config, &token, exp));
        // After: expired
        assert!(!verify_at(&config, &token, exp + 1));
    }

    #[test]
    fn test_expired_token_verifies_false() {
        let config = test_config();
        let now = Utc::now().timestamp();

        // Craft a token that expired an hour ago
        let claims = Claims {
            sub: "user".to_string(),
            role: Some("ROLE_USER".to_string()),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(!verify(&config, &token));
        // Decoding still works; expiry is not a decode failure
        assert_eq!(decode_subject(&config, &token).unwrap(), "user");
    }

    #[test]
    fn test_decode_malformed_is_decode_error() {
        let config = test_config();
        assert!(matches!(
            decode_subject(&config, "garbage"),
            Err(JwtError::Decode)
        ));
        assert!(matches!(
            decode_role(&config, "garbage"),
            Err(JwtError::Decode)
        ));
    }
}
