//! Prompt assembly and image payload parsing

use crate::db::schemas::{ChatMessage, ChatRole};
use crate::types::GroveError;
use base64::Engine;

/// Number of transcript turns carried into the chat prompt
pub const MAX_CONTEXT_TURNS: usize = 10;

/// Fixed instruction sent alongside a trash image.
///
/// The model is asked for a JSON object; the reply is passed through
/// without server-side validation.
pub const CLASSIFY_INSTRUCTION: &str = "Return json data about this trash with the following \
    properties - type, biodegradable (true or false), recyclable (true or false and if true \
    with suggestions on how to recycle) and tip";

/// Concatenate the last [`MAX_CONTEXT_TURNS`] turns and the new message
/// into a single prompt
pub fn build_chat_prompt(history: &[ChatMessage], message: &str) -> String {
    let start = history.len().saturating_sub(MAX_CONTEXT_TURNS);

    let mut prompt = String::new();
    for turn in &history[start..] {
        let label = match turn.role {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
        };
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(&turn.text);
        prompt.push('\n');
    }
    prompt.push_str("user: ");
    prompt.push_str(message);
    prompt
}

/// Split a base64 data URI into its mime type and payload.
///
/// Accepts `data:<mime>;base64,<payload>` or a bare base64 string
/// (assumed JPEG). The payload must decode as standard base64.
pub fn parse_data_uri(input: &str) -> Result<(String, String), GroveError> {
    let (mime, payload) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                GroveError::BadRequest("Malformed data URI: missing ',' separator".into())
            })?;

            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| GroveError::BadRequest("Data URI must be base64-encoded".into()))?;

            if mime.is_empty() {
                ("image/jpeg".to_string(), payload)
            } else {
                (mime.to_string(), payload)
            }
        }
        None => ("image/jpeg".to_string(), input),
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(GroveError::BadRequest("Empty image payload".into()));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| GroveError::BadRequest(format!("Invalid base64 image payload: {}", e)))?;

    Ok((mime, payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: ChatRole, text: &str) -> ChatMessage {
        ChatMessage::now(role, text)
    }

    #[test]
    fn test_prompt_includes_history_and_message() {
        let history = vec![
            turn(ChatRole::User, "how do I compost?"),
            turn(ChatRole::Bot, "Start with a bin."),
        ];

        let prompt = build_chat_prompt(&history, "what about winter?");
        assert_eq!(
            prompt,
            "user: how do I compost?\nbot: Start with a bin.\nuser: what about winter?"
        );
    }

    #[test]
    fn test_prompt_caps_context_at_ten_turns() {
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| turn(ChatRole::User, &format!("message {}", i)))
            .collect();

        let prompt = build_chat_prompt(&history, "latest");
        // Only the last 10 turns survive
        assert!(!prompt.contains("message 14"));
        assert!(prompt.contains("message 15"));
        assert!(prompt.contains("message 24"));
        assert!(prompt.ends_with("user: latest"));
        assert_eq!(prompt.lines().count(), MAX_CONTEXT_TURNS + 1);
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(build_chat_prompt(&[], "hello"), "user: hello");
    }

    #[test]
    fn test_parse_data_uri() {
        let (mime, payload) = parse_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "aGVsbG8=");
    }

    #[test]
    fn test_parse_bare_base64_defaults_to_jpeg() {
        let (mime, payload) = parse_data_uri("aGVsbG8=").unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(payload, "aGVsbG8=");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_data_uri("data:image/png;base64,!!!not-base64!!!").is_err());
        assert!(parse_data_uri("data:image/png,plain-not-base64").is_err());
        assert!(parse_data_uri("data:image/png;base64,").is_err());
    }
}
