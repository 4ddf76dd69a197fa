//! Hosted generative model gateway
//!
//! The `GenerativeModel` trait seams the hosted backend so request
//! handlers never talk to the wire shape directly and tests can
//! substitute a scripted stub.

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;
pub use prompt::{build_chat_prompt, parse_data_uri, CLASSIFY_INSTRUCTION, MAX_CONTEXT_TURNS};

use async_trait::async_trait;

use crate::types::GroveError;

/// One piece of model input: text or inline binary data
#[derive(Debug, Clone)]
pub enum ModelPart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

/// A single generation request against a named model
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub parts: Vec<ModelPart>,
}

impl ModelRequest {
    /// A plain text prompt
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: vec![ModelPart::Text(prompt.into())],
        }
    }

    /// An image plus an instruction
    pub fn image_with_instruction(
        model: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            parts: vec![
                ModelPart::InlineData {
                    mime_type: mime_type.into(),
                    data: data.into(),
                },
                ModelPart::Text(instruction.into()),
            ],
        }
    }
}

/// Backend producing text completions for Grove's chat and
/// classification endpoints
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a text reply for the request.
    ///
    /// Returns the model's raw text; callers decide what (if anything)
    /// to validate.
    async fn generate(&self, request: ModelRequest) -> Result<String, GroveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted backend echoing its text parts back
    struct EchoModel;

    #[async_trait]
    impl GenerativeModel for EchoModel {
        async fn generate(&self, request: ModelRequest) -> Result<String, GroveError> {
            let text: Vec<&str> = request
                .parts
                .iter()
                .filter_map(|p| match p {
                    ModelPart::Text(t) => Some(t.as_str()),
                    ModelPart::InlineData { .. } => None,
                })
                .collect();
            Ok(text.join(" | "))
        }
    }

    #[test]
    fn test_text_request_shape() {
        let request = ModelRequest::text("gemini-2.0-flash", "hello");
        assert_eq!(request.model, "gemini-2.0-flash");
        assert_eq!(request.parts.len(), 1);
    }

    #[test]
    fn test_image_request_orders_image_before_instruction() {
        let request =
            ModelRequest::image_with_instruction("m", "image/png", "AAAA", "classify this");
        assert!(matches!(request.parts[0], ModelPart::InlineData { .. }));
        assert!(matches!(request.parts[1], ModelPart::Text(_)));
    }

    #[test]
    fn test_stub_backend_through_trait_object() {
        let model: std::sync::Arc<dyn GenerativeModel> = std::sync::Arc::new(EchoModel);
        let reply = tokio_test::block_on(
            model.generate(ModelRequest::image_with_instruction("m", "image/png", "AAAA", "tip")),
        )
        .unwrap();
        assert_eq!(reply, "tip");
    }
}
