//! Port for the hosted multimodal model (`generateContent`-style API).

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A request against the remote generative capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    /// The resolved model identifier (e.g., `"gemini-3-pro-image-preview"`).
    pub model: String,
    /// Prompt parts, sent in order.
    pub parts: Vec<RequestPart>,
    /// Output configuration for image-producing calls.
    #[serde(default)]
    pub image_config: Option<ImageConfig>,
}

/// A single prompt part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPart {
    /// Plain text.
    Text(String),
    /// Inline base64 image.
    InlineImage {
        /// MIME type of the image (e.g., `"image/jpeg"`).
        mime_type: String,
        /// Base64 payload.
        #[serde(skip_serializing)]
        #[serde(default)]
        data: String,
    },
}

/// Image output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Aspect ratio (e.g., `"16:9"`).
    pub aspect_ratio: String,
    /// Image size class (`"1K"`, `"2K"`, `"4K"`).
    pub image_size: String,
}

/// Response from the remote capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentResponse {
    /// Candidate completions; only the first is consumed.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Content parts of this candidate.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A content part that may carry text, inline image data, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsePart {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline base64 data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Inline base64 data returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type reported by the model.
    pub mime_type: String,
    /// Base64 payload, untouched.
    pub data: String,
}

impl ContentResponse {
    /// Base64 payload of the first inline-image part in the first candidate.
    #[must_use]
    pub fn first_inline_image(&self) -> Option<&InlineData> {
        self.candidates.first()?.parts.iter().find_map(|p| p.inline_data.as_ref())
    }

    /// Concatenated text of the first candidate, or `None` if it has no text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Boxed future type returned by [`GenerativeModel::generate_content`].
pub type ContentFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ContentResponse, GatewayError>> + Send + 'a>>;

/// Generates content (images or text) from prompt parts via an external API.
pub trait GenerativeModel: Send + Sync {
    /// Issue a single `generateContent` call.
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_>;
}
