//! Chat routes
//!
//! - POST   /api/chat         - send a message, get a plain-text reply
//! - GET    /api/chat/history - the caller's transcript
//! - DELETE /api/chat/history - clear the transcript
//!
//! The request body is either JSON `{ message, history? }` or raw text.
//! A caller-supplied history wins over the stored transcript as model
//! context; the exchange is appended to the stored transcript either
//! way.

use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::ai::{build_chat_prompt, ModelRequest};
use crate::db::schemas::{ChatMessage, ChatRole};
use crate::routes::helpers::{
    authenticate, error_response, json_response, read_body, text_response, BoxBody, ErrorResponse,
    SuccessResponse,
};
use crate::server::AppState;

/// Reply used when the model backend fails
const CHAT_FALLBACK_REPLY: &str = "Sorry, something went wrong.";

const MAX_CHAT_BODY: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Option<Vec<HistoryTurn>>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub role: ChatRole,
    pub text: String,
    pub at: String,
}

/// POST /api/chat
pub async fn handle_chat(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let bytes = match read_body(req, MAX_CHAT_BODY).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    // JSON body, or raw text as the message itself
    let (message, history) = match serde_json::from_slice::<ChatRequest>(&bytes) {
        Ok(body) => (body.message, body.history),
        Err(_) => match String::from_utf8(bytes.to_vec()) {
            Ok(text) => (text, None),
            Err(_) => {
                return json_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorResponse {
                        error: "Message must be JSON or UTF-8 text".into(),
                    },
                )
            }
        },
    };

    let message = message.trim().to_string();
    if message.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "Message must not be empty".into(),
            },
        );
    }

    let model = match state.model() {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    // Caller-supplied history takes precedence over the stored transcript
    let context: Vec<ChatMessage> = match history {
        Some(turns) => turns
            .into_iter()
            .map(|t| ChatMessage::now(t.role, t.text))
            .collect(),
        None => match stores.conversations.get(&claims.user_id).await {
            Ok(conversation) => conversation.messages,
            Err(e) => return error_response(e),
        },
    };

    let prompt = build_chat_prompt(&context, &message);

    let reply = match model
        .generate(ModelRequest::text(&state.args.model_chat, prompt))
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!(user = %claims.user_id, "Chat backend failed: {}", e);
            return text_response(StatusCode::BAD_GATEWAY, CHAT_FALLBACK_REPLY);
        }
    };

    // Persist both turns; a failed append loses transcript, not the reply
    let exchange = [
        ChatMessage::now(ChatRole::User, message),
        ChatMessage::now(ChatRole::Bot, reply.clone()),
    ];
    if let Err(e) = stores.conversations.append(&claims.user_id, &exchange).await {
        warn!(user = %claims.user_id, "Failed to persist chat exchange: {}", e);
    }

    text_response(StatusCode::OK, reply)
}

/// GET /api/chat/history
pub async fn handle_chat_history(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match stores.conversations.get(&claims.user_id).await {
        Ok(conversation) => {
            let messages = conversation
                .messages
                .iter()
                .map(|m| MessageResponse {
                    role: m.role,
                    text: m.text.clone(),
                    at: m.at.try_to_rfc3339_string().unwrap_or_default(),
                })
                .collect();
            json_response(StatusCode::OK, &ConversationResponse { messages })
        }
        Err(e) => error_response(e),
    }
}

/// DELETE /api/chat/history
pub async fn handle_chat_clear(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let claims = match authenticate(&state, &req) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let stores = match state.stores() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match stores.conversations.clear(&claims.user_id).await {
        Ok(()) => json_response(
            StatusCode::OK,
            &SuccessResponse {
                success: true,
                message: "Conversation cleared".into(),
            },
        ),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_with_history() {
        let body: ChatRequest = serde_json::from_str(
            r#"{"message":"hi","history":[{"role":"user","text":"earlier"},{"role":"bot","text":"reply"}]}"#,
        )
        .unwrap();
        assert_eq!(body.message, "hi");
        assert_eq!(body.history.as_ref().unwrap().len(), 2);
        assert_eq!(body.history.unwrap()[1].role, ChatRole::Bot);
    }

    #[test]
    fn test_chat_request_without_history() {
        let body: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(body.history.is_none());
    }
}
