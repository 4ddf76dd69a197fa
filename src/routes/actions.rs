//! Action catalog routes
//!
//! - GET    /api/actions            - list the catalog (any account)
//! - POST   /api/admin/actions      - define a new action (admin)
//! - DELETE /api/admin/actions/{id} - remove an action (admin)

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::schemas::{ActionCategory, ActionDoc};
use crate::routes::helpers::{
    authenticate, authenticate_admin, error_response, json_response, parse_json_body, BoxBody,
    ErrorResponse, SuccessResponse,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub points: i64,
    #[serde(default)]
    pub category: ActionCategory,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub proof_required: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: i64,
    pub category: ActionCategory,
    pub icon: String,
    pub proof_required: bool,
}

impl ActionResponse {
    pub fn from_doc(action: &ActionDoc) -> Self {
        Self {
            id: action.id.clone(),
            title: action.title.clone(),
            description: action.description.clone(),
            points: action.points,
            category: action.category,
            icon: action.icon.clone(),
            proof_required: action.proof_required,
        }
    }
}

/// GET /api/actions
pub async fn handle_actions_list(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = authenticate(&state, &req) {
        return error_response(e);
    }

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match stores.actions.list_all().await {
        Ok(actions) => {
            let list: Vec<ActionResponse> = actions.iter().map(ActionResponse::from_doc).collect();
            json_response(StatusCode::OK, &list)
        }
        Err(e) => error_response(e),
    }
}

/// POST /api/admin/actions
pub async fn handle_action_create(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let admin = match authenticate_admin(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: CreateActionRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if body.title.trim().is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "Action title must not be empty".into(),
            },
        );
    }

    if body.points <= 0 {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "Action points must be positive".into(),
            },
        );
    }

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let action = ActionDoc::new(
        body.title.trim().to_string(),
        body.description,
        body.points,
        body.category,
        body.icon,
        body.proof_required,
    );

    match stores.actions.add(action.clone()).await {
        Ok(()) => {
            info!(admin = %admin.email, action = %action.title, "Action created");
            json_response(StatusCode::CREATED, &ActionResponse::from_doc(&action))
        }
        Err(e) => error_response(e),
    }
}

/// DELETE /api/admin/actions/{id}
pub async fn handle_action_delete(
    req: Request<Incoming>,
    state: Arc<AppState>,
    id: &str,
) -> Response<BoxBody> {
    let admin = match authenticate_admin(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match stores.actions.remove(id).await {
        Ok(()) => {
            info!(admin = %admin.email, action = %id, "Action removed");
            json_response(
                StatusCode::OK,
                &SuccessResponse {
                    success: true,
                    message: format!("Action {} removed", id),
                },
            )
        }
        Err(e) => error_response(e),
    }
}
