//! Gemini REST client
//!
//! Speaks the `generateContent` wire shape of the hosted Gemini API.
//! The API key comes from configuration only; requests carry a timeout
//! so a hung upstream cannot hold a request open indefinitely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::ai::{GenerativeModel, ModelPart, ModelRequest};
use crate::types::GroveError;

/// Client for the hosted Gemini generateContent API
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, GroveError> {
        if api_key.is_empty() {
            return Err(GroveError::Config("Model API key must not be empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GroveError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> Result<String, GroveError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let body = GenerateContentRequest::from_parts(&request.parts);

        debug!("Calling model backend: {}", request.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GroveError::Model(format!("Model request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GroveError::Model(format!(
                "Model backend returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GroveError::Model(format!("Malformed model response: {}", e)))?;

        parsed
            .first_text()
            .ok_or_else(|| GroveError::Model("Model response contained no text".into()))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_parts(parts: &[ModelPart]) -> Self {
        let parts = parts
            .iter()
            .map(|part| match part {
                ModelPart::Text(text) => PartBody::Text { text: text.clone() },
                ModelPart::InlineData { mime_type, data } => PartBody::Inline {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: data.clone(),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![Content { parts }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<PartBody>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PartBody {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;

        let text: String = content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_wire_shape() {
        let request = GenerateContentRequest::from_parts(&[ModelPart::Text("hello".into())]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_image_request_wire_shape() {
        let request = GenerateContentRequest::from_parts(&[
            ModelPart::InlineData {
                mime_type: "image/jpeg".into(),
                data: "AAAA".into(),
            },
            ModelPart::Text("what is this?".into()),
        ]);
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "what is this?");
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "It is " }, { "text": "recyclable." }] } }
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_text().unwrap(), "It is recyclable.");
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{ "candidates": [{ "content": { "parts": [] } }] }"#).unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(GeminiClient::new("https://example.com", "", Duration::from_secs(30)).is_err());
    }
}
