//! Waste-pickup routes
//!
//! - POST /api/pickup/quote   - cost estimate for a pickup
//! - POST /api/pickup/confirm - dispatch a collector and count the call

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::routes::helpers::{
    authenticate, error_response, json_response, parse_json_body, BoxBody, ErrorResponse,
};
use crate::server::AppState;
use crate::services::pickup::{assign_collector, estimate_cost, Collector, TrashType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub trash_type: TrashType,
    pub weight_kg: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub trash_type: TrashType,
    pub trash_label: &'static str,
    pub weight_kg: f64,
    pub estimated_cost: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub location: String,
    pub trash_type: TrashType,
    pub weight_kg: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub collector: &'static Collector,
    pub estimated_cost: i64,
    /// Total confirmed pickups for this account, including this one
    pub trash_calls: i64,
}

fn validate_weight(weight_kg: f64) -> Result<(), Response<BoxBody>> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "weightKg must be a positive number".into(),
            },
        ));
    }
    Ok(())
}

/// POST /api/pickup/quote
pub async fn handle_pickup_quote(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = authenticate(&state, &req) {
        return error_response(e);
    }

    let body: QuoteRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if let Err(resp) = validate_weight(body.weight_kg) {
        return resp;
    }

    json_response(
        StatusCode::OK,
        &QuoteResponse {
            trash_type: body.trash_type,
            trash_label: body.trash_type.label(),
            weight_kg: body.weight_kg,
            estimated_cost: estimate_cost(body.trash_type, body.weight_kg),
        },
    )
}

/// POST /api/pickup/confirm
pub async fn handle_pickup_confirm(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: ConfirmRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if body.location.trim().is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "A pickup location is required".into(),
            },
        );
    }

    if let Err(resp) = validate_weight(body.weight_kg) {
        return resp;
    }

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let collector = assign_collector();

    match stores.ledger.increment_trash_calls(&claims.user_id, 1).await {
        Ok(stats) => {
            info!(
                user = %claims.user_id,
                collector = %collector.name,
                "Pickup confirmed"
            );
            json_response(
                StatusCode::OK,
                &ConfirmResponse {
                    collector,
                    estimated_cost: estimate_cost(body.trash_type, body.weight_kg),
                    trash_calls: stats.trash_calls,
                },
            )
        }
        Err(e) => error_response(e),
    }
}
