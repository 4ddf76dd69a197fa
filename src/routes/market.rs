//! Marketplace routes
//!
//! - GET  /api/market/items    - the item catalog
//! - POST /api/market/purchase - spend credits on an item

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::routes::helpers::{
    authenticate, error_response, json_response, parse_json_body, BoxBody, ErrorResponse,
};
use crate::routes::stats::StatsResponse;
use crate::server::AppState;
use crate::services::market;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub item_id: String,
}

/// GET /api/market/items
pub async fn handle_market_items(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = authenticate(&state, &req) {
        return error_response(e);
    }

    json_response(StatusCode::OK, &market::market_catalog())
}

/// POST /api/market/purchase
///
/// Records the purchase and debits the price; an over-spend drains the
/// balance to zero rather than failing.
pub async fn handle_market_purchase(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: PurchaseRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    let item = match market::find_item(&body.item_id) {
        Some(i) => i,
        None => {
            return json_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse {
                    error: format!("No marketplace item with id {}", body.item_id),
                },
            )
        }
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match market::purchase(&stores.ledger, &claims.user_id, item).await {
        Ok(stats) => {
            info!(
                user = %claims.user_id,
                item = %item.name,
                price = item.price,
                credits = stats.credits,
                "Marketplace purchase"
            );
            json_response(StatusCode::OK, &StatsResponse::from_doc(&stats))
        }
        Err(e) => error_response(e),
    }
}
