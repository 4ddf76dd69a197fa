//! JWT session token handling
//!
//! Replaces the bare user-id token the original client kept in local
//! storage: tokens are signed (HS256), carry the permission level, and
//! expire.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::PermissionLevel;
use crate::types::GroveError;

/// Payload stored in the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier
    pub user_id: String,
    /// Login email
    pub email: String,
    /// Permission level granted at login
    pub permission_level: PermissionLevel,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    /// Whether these claims carry admin rights
    pub fn is_admin(&self) -> bool {
        self.permission_level >= PermissionLevel::Admin
    }
}

/// Input for creating a new token
#[derive(Debug, Clone)]
pub struct TokenInput {
    pub user_id: String,
    pub email: String,
    pub permission_level: PermissionLevel,
}

/// JWT validator and generator
#[derive(Clone)]
pub struct JwtValidator {
    secret: String,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a new JWT validator.
    ///
    /// Returns an error if the secret is empty or too short.
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self, GroveError> {
        if secret.is_empty() {
            return Err(GroveError::Config("JWT secret must not be empty".into()));
        }

        if secret.len() < 32 {
            return Err(GroveError::Config(
                "JWT secret must be at least 32 characters".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Generate a session token for an authenticated account
    pub fn generate_token(&self, input: TokenInput) -> Result<(String, u64), GroveError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GroveError::Auth(format!("System time error: {}", e)))?
            .as_secs();

        let expires_at = now + self.expiry_seconds;
        let claims = Claims {
            user_id: input.user_id,
            email: input.email,
            permission_level: input.permission_level,
            iat: now,
            exp: expires_at,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| GroveError::Auth(format!("Failed to generate token: {}", e)))?;

        Ok((token, expires_at))
    }

    /// Verify and decode a session token
    pub fn verify_token(&self, token: &str) -> Result<Claims, GroveError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| {
            use jsonwebtoken::errors::ErrorKind;
            let msg = match err.kind() {
                ErrorKind::ExpiredSignature => "Token expired",
                ErrorKind::InvalidToken => "Invalid token",
                ErrorKind::InvalidSignature => "Invalid signature",
                _ => "Token validation failed",
            };
            GroveError::Unauthorized(msg.into())
        })
    }
}

/// Extract token from Authorization header.
/// Supports "Bearer <token>" format and raw tokens.
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    // Also support raw token (for flexibility)
    if !header.contains(' ') {
        let token = header.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> JwtValidator {
        JwtValidator::new(
            "test-secret-that-is-at-least-32-characters-long".into(),
            3600,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_and_verify_token() {
        let validator = test_validator();

        let (token, expires_at) = validator
            .generate_token(TokenInput {
                user_id: "u-123".into(),
                email: "asha@example.com".into(),
                permission_level: PermissionLevel::Authenticated,
            })
            .unwrap();

        assert!(!token.is_empty());
        assert!(expires_at > 0);

        let claims = validator.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, "u-123");
        assert_eq!(claims.email, "asha@example.com");
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_admin_claims() {
        let validator = test_validator();

        let (token, _) = validator
            .generate_token(TokenInput {
                user_id: "u-9".into(),
                email: "ops@grove.io".into(),
                permission_level: PermissionLevel::Admin,
            })
            .unwrap();

        let claims = validator.verify_token(&token).unwrap();
        assert!(claims.is_admin());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let validator = test_validator();
        assert!(validator.verify_token("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let validator1 = test_validator();
        let validator2 = JwtValidator::new(
            "different-secret-that-is-at-least-32-chars".into(),
            3600,
        )
        .unwrap();

        let (token, _) = validator1
            .generate_token(TokenInput {
                user_id: "u-1".into(),
                email: "a@b.c".into(),
                permission_level: PermissionLevel::Authenticated,
            })
            .unwrap();

        assert!(validator2.verify_token(&token).is_err());
    }

    #[test]
    fn test_secret_length_enforced() {
        assert!(JwtValidator::new("short".into(), 3600).is_err());
        assert!(JwtValidator::new("".into(), 3600).is_err());
        assert!(JwtValidator::new("this-secret-is-at-least-32-chars-long".into(), 3600).is_ok());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(
            extract_token_from_header(Some("Bearer abc123")),
            Some("abc123")
        );
        assert_eq!(extract_token_from_header(Some("abc123")), Some("abc123"));
        assert_eq!(extract_token_from_header(None), None);
        assert_eq!(extract_token_from_header(Some("")), None);
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("Basic abc123")), None);
    }
}
