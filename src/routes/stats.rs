//! Ledger routes
//!
//! - GET  /api/stats         - the caller's ledger
//! - POST /api/admin/credits - adjust a user's balance by a delta

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::schemas::StatsDoc;
use crate::routes::helpers::{
    authenticate, authenticate_admin, error_response, json_response, parse_json_body, BoxBody,
    ErrorResponse,
};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub user_id: String,
    pub tasks_completed: i64,
    pub credits: i64,
    pub trash_calls: i64,
    pub purchases: Vec<PurchaseResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub purchased_at: String,
}

impl StatsResponse {
    pub fn from_doc(stats: &StatsDoc) -> Self {
        Self {
            user_id: stats.user_id.clone(),
            tasks_completed: stats.tasks_completed,
            credits: stats.credits,
            trash_calls: stats.trash_calls,
            purchases: stats
                .purchases
                .iter()
                .map(|p| PurchaseResponse {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    price: p.price,
                    purchased_at: p.purchased_at.try_to_rfc3339_string().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustCreditsRequest {
    pub email: String,
    pub delta: i64,
}

/// GET /api/stats
pub async fn handle_stats(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match stores.ledger.get(&claims.user_id).await {
        Ok(stats) => json_response(StatusCode::OK, &StatsResponse::from_doc(&stats)),
        Err(e) => error_response(e),
    }
}

/// POST /api/admin/credits
///
/// Adjusts a user's balance by a delta (positive or negative); the
/// result is clamped at zero by the ledger.
pub async fn handle_admin_credits(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let admin = match authenticate_admin(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: AdjustCreditsRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let email = body.email.trim().to_lowercase();

    let target = match stores.users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return json_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse {
                    error: format!("No account with email {}", email),
                },
            )
        }
        Err(e) => return error_response(e),
    };

    match stores.ledger.add_credits(&target.id, body.delta).await {
        Ok(stats) => {
            info!(
                admin = %admin.email,
                target = %target.email,
                delta = body.delta,
                credits = stats.credits,
                "Admin credit adjustment"
            );
            json_response(StatusCode::OK, &StatsResponse::from_doc(&stats))
        }
        Err(e) => error_response(e),
    }
}
