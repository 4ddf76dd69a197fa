//! Submission routes
//!
//! - POST /api/submissions                    - submit an action proof
//! - GET  /api/admin/submissions[?status=]    - review queue (admin)
//! - POST /api/admin/submissions/{id}/review  - approve or reject (admin)

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::schemas::{SubmissionDoc, SubmissionStatus};
use crate::routes::helpers::{
    authenticate, authenticate_admin, error_response, json_response, parse_json_body_with_limit,
    query_param, BoxBody, ErrorResponse, MAX_IMAGE_BODY,
};
use crate::server::AppState;
use crate::services::resolve_submission;
use crate::types::GroveError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub action_id: String,
    #[serde(default)]
    pub description: String,
    /// Proof image as a data URI; required when the action demands proof
    #[serde(default)]
    pub proof_image: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub user_id: String,
    pub action_id: String,
    pub action_title: String,
    pub description: String,
    pub status: SubmissionStatus,
    pub submitted_at: String,
    pub points: i64,
    /// Proof is only echoed on the admin view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,
}

impl SubmissionResponse {
    fn from_doc(submission: &SubmissionDoc, include_proof: bool) -> Self {
        Self {
            id: submission.id.clone(),
            user_id: submission.user_id.clone(),
            action_id: submission.action_id.clone(),
            action_title: submission.action_title.clone(),
            description: submission.description.clone(),
            status: submission.status,
            submitted_at: submission
                .submitted_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            points: submission.points,
            proof_image: if include_proof && !submission.proof_image.is_empty() {
                Some(submission.proof_image.clone())
            } else {
                None
            },
        }
    }
}

/// POST /api/submissions
///
/// Points and title are denormalized from the catalog at submit time so
/// later catalog edits do not change what a pending proof is worth.
pub async fn handle_submission_create(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: CreateSubmissionRequest = match parse_json_body_with_limit(req, MAX_IMAGE_BODY).await
    {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let actions = match stores.actions.list_all().await {
        Ok(a) => a,
        Err(e) => return error_response(e),
    };

    let action = match actions.iter().find(|a| a.id == body.action_id) {
        Some(a) => a,
        None => {
            return json_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse {
                    error: format!("No action with id {}", body.action_id),
                },
            )
        }
    };

    if action.proof_required && body.proof_image.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: format!("Action '{}' requires a proof image", action.title),
            },
        );
    }

    let submission = SubmissionDoc::new(
        claims.user_id.clone(),
        action.id.clone(),
        action.title.clone(),
        body.proof_image,
        body.description,
        action.points,
    );

    match stores.submissions.add(submission.clone()).await {
        Ok(()) => {
            info!(
                user = %claims.user_id,
                action = %action.title,
                submission = %submission.id,
                "Proof submitted"
            );
            json_response(
                StatusCode::CREATED,
                &SubmissionResponse::from_doc(&submission, false),
            )
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/admin/submissions[?status=pending|approved|rejected]
pub async fn handle_submissions_list(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = authenticate_admin(&state, &req) {
        return error_response(e);
    }

    let status = match query_param(&req, "status") {
        Some(raw) => match parse_status(&raw) {
            Ok(s) => Some(s),
            Err(e) => return error_response(e),
        },
        None => None,
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match stores.submissions.list_all(status).await {
        Ok(submissions) => {
            let list: Vec<SubmissionResponse> = submissions
                .iter()
                .map(|s| SubmissionResponse::from_doc(s, true))
                .collect();
            json_response(StatusCode::OK, &list)
        }
        Err(e) => error_response(e),
    }
}

/// POST /api/admin/submissions/{id}/review
pub async fn handle_submission_review(
    req: Request<Incoming>,
    state: Arc<AppState>,
    id: &str,
) -> Response<BoxBody> {
    let admin = match authenticate_admin(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let body: ReviewRequest = match parse_json_body_with_limit(req, 4096).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match resolve_submission(stores, id, body.status).await {
        Ok(submission) => {
            info!(
                admin = %admin.email,
                submission = %submission.id,
                status = %submission.status,
                "Submission reviewed"
            );
            json_response(
                StatusCode::OK,
                &SubmissionResponse::from_doc(&submission, false),
            )
        }
        Err(e) => error_response(e),
    }
}

fn parse_status(raw: &str) -> Result<SubmissionStatus, GroveError> {
    match raw {
        "pending" => Ok(SubmissionStatus::Pending),
        "approved" => Ok(SubmissionStatus::Approved),
        "rejected" => Ok(SubmissionStatus::Rejected),
        other => Err(GroveError::BadRequest(format!(
            "Unknown status filter '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("pending").unwrap(), SubmissionStatus::Pending);
        assert_eq!(parse_status("approved").unwrap(), SubmissionStatus::Approved);
        assert_eq!(parse_status("rejected").unwrap(), SubmissionStatus::Rejected);
        assert!(parse_status("all").is_err());
    }

    #[test]
    fn test_review_request_rejects_pending() {
        // Deserializes fine; the store refuses the non-terminal target
        let body: ReviewRequest = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert!(!body.status.is_terminal());
    }

    #[test]
    fn test_proof_omitted_from_user_response() {
        let submission = SubmissionDoc::new(
            "u-1".into(),
            "a-1".into(),
            "Use public transportation".into(),
            "data:image/jpeg;base64,AAAA".into(),
            "bus ride".into(),
            50,
        );

        let user_view = SubmissionResponse::from_doc(&submission, false);
        assert!(user_view.proof_image.is_none());

        let admin_view = SubmissionResponse::from_doc(&submission, true);
        assert_eq!(
            admin_view.proof_image.as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );
    }
}
