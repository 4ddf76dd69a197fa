//! HTTP routes for authentication
//!
//! - POST /auth/register - Create an account and get a session token
//! - POST /auth/login    - Authenticate and get a session token
//! - GET  /auth/me       - Get current account info from the token

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{hash_password, level_for_email, verify_password, TokenInput};
use crate::db::schemas::UserDoc;
use crate::routes::helpers::{
    authenticate, error_response, json_response, parse_json_body, BoxBody, ErrorResponse,
};
use crate::server::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub email_verified: bool,
    pub created_at: String,
}

impl UserResponse {
    fn from_doc(user: &UserDoc) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            email_verified: user.email_verified,
            created_at: user
                .metadata
                .created_at
                .and_then(|d| d.try_to_rfc3339_string().ok())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserResponse,
    pub permission_level: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// POST /auth/register
///
/// Flow:
/// 1. Validate required fields
/// 2. Check the email is unused (the unique index backstops a race)
/// 3. Hash the password with argon2
/// 4. Store the account
/// 5. Generate and return a session token
pub async fn handle_register(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: RegisterRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "Missing required fields: name, email, password".into(),
            },
        );
    }

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let email = body.email.trim().to_lowercase();

    match stores.users.find_by_email(&email).await {
        Ok(Some(_)) => {
            return json_response(
                StatusCode::CONFLICT,
                &ErrorResponse {
                    error: "An account with this email already exists".into(),
                },
            )
        }
        Ok(None) => {}
        Err(e) => return error_response(e),
    }

    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };

    let user = UserDoc::new(body.name.trim().to_string(), email, body.phone, password_hash);

    if let Err(e) = stores.users.create(user.clone()).await {
        warn!("Registration failed for {}: {}", user.email, e);
        return error_response(e);
    }

    info!("Registered account {} ({})", user.id, user.email);

    issue_token_response(&state, &user)
}

/// POST /auth/login
pub async fn handle_login(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let body: LoginRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let email = body.email.trim().to_lowercase();

    let user = match stores.users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return json_response(
                StatusCode::UNAUTHORIZED,
                &ErrorResponse {
                    error: "Invalid email or password".into(),
                },
            )
        }
        Err(e) => return error_response(e),
    };

    match verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return json_response(
                StatusCode::UNAUTHORIZED,
                &ErrorResponse {
                    error: "Invalid email or password".into(),
                },
            )
        }
        Err(e) => return error_response(e),
    }

    info!("Login for account {} ({})", user.id, user.email);

    issue_token_response(&state, &user)
}

/// GET /auth/me
///
/// Resolves the token back to the stored account, so a deleted account
/// invalidates its outstanding sessions.
pub async fn handle_me(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let user = match stores.users.find_by_id(&claims.user_id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return json_response(
                StatusCode::UNAUTHORIZED,
                &ErrorResponse {
                    error: "Account no longer exists".into(),
                },
            )
        }
        Err(e) => return error_response(e),
    };

    json_response(
        StatusCode::OK,
        &MeResponse {
            user: UserResponse::from_doc(&user),
            permission_level: claims.permission_level.to_string(),
        },
    )
}

/// Build the token + user payload shared by register and login
fn issue_token_response(state: &AppState, user: &UserDoc) -> Response<BoxBody> {
    let level = level_for_email(&user.email, &state.admin_emails);

    let (token, expires_at) = match state.jwt.generate_token(TokenInput {
        user_id: user.id.clone(),
        email: user.email.clone(),
        permission_level: level,
    }) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };

    json_response(
        StatusCode::OK,
        &AuthResponse {
            token,
            expires_at,
            user: UserResponse::from_doc(user),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_missing_phone() {
        let body: RegisterRequest = serde_json::from_str(
            r#"{"name":"Asha","email":"asha@example.com","password":"pw"}"#,
        )
        .unwrap();
        assert!(body.phone.is_empty());
    }

    #[test]
    fn test_user_response_shape() {
        let user = UserDoc::new(
            "Asha".into(),
            "asha@example.com".into(),
            "555-0100".into(),
            "$argon2id$stub".into(),
        );

        let response = UserResponse::from_doc(&user);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["email"], "asha@example.com");
        assert_eq!(json["emailVerified"], true);
        assert!(json["createdAt"].as_str().is_some());
    }
}
