//! Trash image classification route
//!
//! - POST /api/classify - forward an image to the model with the fixed
//!   classification instruction
//!
//! The model is asked for a JSON object `{type, biodegradable,
//! recyclable, tip}`; its reply is returned verbatim as plain text
//! without server-side validation.

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::ai::{parse_data_uri, ModelRequest, CLASSIFY_INSTRUCTION};
use crate::routes::helpers::{
    authenticate, error_response, parse_json_body_with_limit, text_response, BoxBody,
    MAX_IMAGE_BODY,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Image as a base64 data URI
    pub image: String,
}

/// POST /api/classify
pub async fn handle_classify(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: ClassifyRequest = match parse_json_body_with_limit(req, MAX_IMAGE_BODY).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    let (mime_type, payload) = match parse_data_uri(&body.image) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(e),
    };

    let model = match state.model() {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };

    let request = ModelRequest::image_with_instruction(
        &state.args.model_classify,
        mime_type,
        payload,
        CLASSIFY_INSTRUCTION,
    );

    match model.generate(request).await {
        Ok(text) => text_response(StatusCode::OK, text),
        Err(e) => {
            warn!(user = %claims.user_id, "Classification backend failed: {}", e);
            error_response(e)
        }
    }
}
