//! Shared request/response plumbing for route handlers

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::{extract_token_from_header, Claims};
use crate::server::AppState;
use crate::types::GroveError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Default JSON body limit
const MAX_JSON_BODY: usize = 64 * 1024;

/// Limit for bodies carrying data-URI images (proofs, classification)
pub const MAX_IMAGE_BODY: usize = 4 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

/// Plain-text response (chat and classification replies)
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<BoxBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Access-Control-Allow-Origin", "*")
        .body(full_body(body))
        .unwrap()
}

/// Map a [`GroveError`] onto a JSON error body with its status code
pub fn error_response(err: GroveError) -> Response<BoxBody> {
    let (status, message) = err.into_status_code_and_body();
    json_response(status, &ErrorResponse { error: message })
}

pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub fn not_found(path: &str) -> Response<BoxBody> {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorResponse {
            error: format!("No route for {}", path),
        },
    )
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

/// Read the request body up to `limit` bytes
pub async fn read_body(req: Request<Incoming>, limit: usize) -> Result<Bytes, GroveError> {
    let body = req
        .collect()
        .await
        .map_err(|e| GroveError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > limit {
        return Err(GroveError::Http("Request body too large".into()));
    }

    Ok(bytes)
}

/// Parse a JSON request body (default size limit)
pub async fn parse_json_body<T: for<'de> Deserialize<'de>>(
    req: Request<Incoming>,
) -> Result<T, GroveError> {
    parse_json_body_with_limit(req, MAX_JSON_BODY).await
}

/// Parse a JSON request body with an explicit size limit
pub async fn parse_json_body_with_limit<T: for<'de> Deserialize<'de>>(
    req: Request<Incoming>,
    limit: usize,
) -> Result<T, GroveError> {
    let bytes = read_body(req, limit).await?;

    serde_json::from_slice(&bytes)
        .map_err(|e| GroveError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Authenticate the request from its Authorization header
pub fn authenticate(state: &AppState, req: &Request<Incoming>) -> Result<Claims, GroveError> {
    let header = req
        .headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = extract_token_from_header(header)
        .ok_or_else(|| GroveError::Unauthorized("Missing bearer token".into()))?;

    state.jwt.verify_token(token)
}

/// Authenticate and require the admin permission level
pub fn authenticate_admin(state: &AppState, req: &Request<Incoming>) -> Result<Claims, GroveError> {
    let claims = authenticate(state, req)?;
    if !claims.is_admin() {
        return Err(GroveError::Forbidden("Admin access required".into()));
    }
    Ok(claims)
}

/// Read one query parameter from a request URI
pub fn query_param(req: &Request<Incoming>, name: &str) -> Option<String> {
    let query = req.uri().query()?;

    for param in query.split('&') {
        if let Some((key, value)) = param.split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }

    None
}
