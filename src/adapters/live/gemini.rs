//! Live adapter for the Gemini `generateContent` API.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::GatewayError;
use crate::ports::generative_model::{
    Candidate, ContentFuture, ContentRequest, ContentResponse, GenerativeModel, InlineData,
    RequestPart, ResponsePart,
};

/// Live Gemini model that calls the Google AI API.
pub struct GeminiModel {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiModel {
    /// Create a new Gemini model client.
    ///
    /// A missing key is reported per call so the caller can still decide
    /// how to prompt for one.
    #[must_use]
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

/// Build the JSON body for a `generateContent` call.
pub(crate) fn request_body(request: &ContentRequest) -> Value {
    let parts: Vec<Value> = request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Text(text) => json!({ "text": text }),
            RequestPart::InlineImage { mime_type, data } => {
                json!({ "inlineData": { "mimeType": mime_type, "data": data } })
            }
        })
        .collect();

    let mut body = json!({ "contents": [{ "parts": parts }] });
    if let Some(ref image) = request.image_config {
        body["generationConfig"] = json!({
            "responseModalities": ["IMAGE"],
            "imageConfig": {
                "aspectRatio": image.aspect_ratio,
                "imageSize": image.image_size,
            }
        });
    }
    body
}

impl GenerativeModel for GeminiModel {
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or_else(|| GatewayError::MissingApiKey {
                env_var: "GEMINI_API_KEY".into(),
            })?;
            let url = format!("{}/{}:generateContent", self.base_url, request.model);
            debug!(%url, parts = request.parts.len(), "POST generateContent");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request_body(&request))
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(GatewayError::Api { status: status.as_u16(), message: response_text });
            }

            let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
                GatewayError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            Ok(parsed.into())
        })
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

impl From<GeminiResponse> for ContentResponse {
    fn from(response: GeminiResponse) -> Self {
        let candidates = response
            .candidates
            .into_iter()
            .map(|c| Candidate {
                parts: c
                    .content
                    .map(|content| content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| ResponsePart {
                        text: p.text,
                        inline_data: p
                            .inline_data
                            .map(|d| InlineData { mime_type: d.mime_type, data: d.data }),
                    })
                    .collect(),
            })
            .collect();
        Self { candidates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generative_model::ImageConfig;

    #[test]
    fn body_for_image_request() {
        let request = ContentRequest {
            model: "gemini-3-pro-image-preview".into(),
            parts: vec![RequestPart::Text("bus. Negative prompt: no logos".into())],
            image_config: Some(ImageConfig { aspect_ratio: "16:9".into(), image_size: "1K".into() }),
        };
        let body = request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "bus. Negative prompt: no logos");
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[test]
    fn body_for_vision_request() {
        let request = ContentRequest {
            model: "gemini-3-pro-preview".into(),
            parts: vec![
                RequestPart::InlineImage { mime_type: "image/jpeg".into(), data: "/9j/".into() },
                RequestPart::Text("Analiza".into()),
            ],
            image_config: None,
        };
        let body = request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "/9j/");
        assert_eq!(body["contents"][0]["parts"][1]["text"], "Analiza");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn parse_mixed_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Aquí está"},
                        {"inlineData": {"mimeType": "image/png", "data": "ABC123"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let response = ContentResponse::from(parsed);
        assert_eq!(response.first_inline_image().unwrap().data, "ABC123");
        assert_eq!(response.text().as_deref(), Some("Aquí está"));
    }

    #[test]
    fn parse_blocked_candidate_without_content() {
        let raw = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let response = ContentResponse::from(parsed);
        assert!(response.first_inline_image().is_none());
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let model = GeminiModel::new("http://127.0.0.1:9", None);
        let request = ContentRequest {
            model: "gemini-3-pro-preview".into(),
            parts: vec![RequestPart::Text("hola".into())],
            image_config: None,
        };
        let err = model.generate_content(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingApiKey { .. }));
    }
}
