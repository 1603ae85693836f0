//! Stateless gateway to the hosted generative model.
//!
//! Every operation issues exactly one remote call and normalizes the outcome.
//! Nothing is retried or cached, and no error escapes the public operations:
//! image calls return a [`VisualResult`], analysis degrades to a friendly
//! string, and validation fails closed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::model::ModelSet;
use crate::ports::generative_model::{ContentRequest, ContentResponse, ImageConfig, RequestPart};
use crate::ports::GenerativeModel;
use crate::prompt;

/// Error-message fragments the remote API uses for a missing or rejected key.
const CREDENTIAL_MARKERS: [&str; 2] = ["entity was not found", "permission denied"];

/// MIME type sent with uploaded photos.
const PHOTO_MIME: &str = "image/jpeg";

/// A request for a service preview image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualRequest {
    /// What the image should show.
    pub subject_prompt: String,
    /// Extra constraints appended to the global negative prompt.
    pub negative_fragment: Option<String>,
}

impl VisualRequest {
    /// Build a request, rejecting an empty subject. Non-blank text is kept
    /// as given; a blank fragment counts as none.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] if `subject_prompt` is blank.
    pub fn new(subject_prompt: &str, negative_fragment: Option<&str>) -> Result<Self, GatewayError> {
        if subject_prompt.trim().is_empty() {
            return Err(GatewayError::InvalidArgument("subject prompt must not be empty".into()));
        }
        Ok(Self {
            subject_prompt: subject_prompt.to_string(),
            negative_fragment: negative_fragment
                .filter(|f| !f.trim().is_empty())
                .map(str::to_string),
        })
    }

    /// Negative prompt sent downstream: the baseline plus this request's fragment.
    #[must_use]
    pub fn negative_prompt(&self) -> String {
        prompt::compose_negative(self.negative_fragment.as_deref())
    }

    /// Combined prompt text with the negative constraints embedded.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        prompt::visual_prompt(&self.subject_prompt, &self.negative_prompt())
    }
}

/// Why an image call produced no artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, quota, HTTP or malformed-response failure.
    Transport,
    /// The call succeeded but carried no usable part.
    ContentAbsent,
    /// The deadline elapsed.
    Timeout,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => f.write_str("request failed"),
            Self::ContentAbsent => f.write_str("no image in response"),
            Self::Timeout => f.write_str("timed out"),
        }
    }
}

/// Normalized outcome of an image-producing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualResult {
    /// Embeddable `data:` URI of the generated image.
    ImageArtifact(String),
    /// The usage credential is missing or was rejected.
    CredentialError,
    /// Anything else went wrong.
    Failure(FailureKind),
}

/// Map a gateway error onto the normalized result. This is the only place
/// that inspects error wording.
#[must_use]
pub fn classify_failure(err: &GatewayError) -> VisualResult {
    match err {
        GatewayError::MissingApiKey { .. } | GatewayError::CredentialRejected => {
            VisualResult::CredentialError
        }
        GatewayError::Timeout { .. } => VisualResult::Failure(FailureKind::Timeout),
        GatewayError::ContentAbsent => VisualResult::Failure(FailureKind::ContentAbsent),
        other => {
            let message = other.to_string().to_lowercase();
            if CREDENTIAL_MARKERS.iter().any(|m| message.contains(m)) {
                VisualResult::CredentialError
            } else {
                VisualResult::Failure(FailureKind::Transport)
            }
        }
    }
}

/// Turns semantic requests into remote calls and normalized results.
#[derive(Clone)]
pub struct Gateway {
    model: Arc<dyn GenerativeModel>,
    models: ModelSet,
    image: ImageConfig,
    timeout: Duration,
}

impl Gateway {
    /// Gateway with default models, a 16:9 1K image config and a 120 s deadline.
    #[must_use]
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            models: ModelSet::default(),
            image: ImageConfig { aspect_ratio: "16:9".into(), image_size: "1K".into() },
            timeout: Duration::from_secs(120),
        }
    }

    /// Use these (already resolved) models.
    #[must_use]
    pub fn with_models(mut self, models: ModelSet) -> Self {
        self.models = models;
        self
    }

    /// Request previews with this image configuration.
    #[must_use]
    pub fn with_image_config(mut self, image: ImageConfig) -> Self {
        self.image = image;
        self
    }

    /// Bound every remote call by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a preview image for `request`.
    pub async fn generate_visual(&self, request: &VisualRequest) -> VisualResult {
        let content = ContentRequest {
            model: self.models.visual.clone(),
            parts: vec![RequestPart::Text(request.prompt_text())],
            image_config: Some(self.image.clone()),
        };
        debug!(model = %content.model, "requesting service visual");
        normalize_image(self.call(&content).await)
    }

    /// Restyle an uploaded party photo according to `instruction`.
    pub async fn edit_photo(&self, image_base64: &str, instruction: &str) -> VisualResult {
        if image_base64.is_empty() {
            warn!("edit requested with an empty photo");
            return VisualResult::Failure(FailureKind::ContentAbsent);
        }
        let content = ContentRequest {
            model: self.models.edit.clone(),
            parts: vec![photo_part(image_base64), RequestPart::Text(prompt::edit_prompt(instruction))],
            image_config: None,
        };
        debug!(model = %content.model, "requesting photo edit");
        normalize_image(self.call(&content).await)
    }

    /// Recommend a package for the group in the photo.
    ///
    /// Never fails: any error yields [`prompt::ANALYSIS_FALLBACK`].
    pub async fn analyze_image(&self, image_base64: &str) -> String {
        match self.try_analyze_image(image_base64).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "photo analysis failed");
                prompt::ANALYSIS_FALLBACK.to_string()
            }
        }
    }

    /// Analysis with the failure kept visible.
    ///
    /// # Errors
    ///
    /// Returns the remote error, or [`GatewayError::ContentAbsent`] if the
    /// reply had no text.
    pub async fn try_analyze_image(&self, image_base64: &str) -> Result<String, GatewayError> {
        self.ask_about_photo(image_base64, prompt::ANALYSIS_PROMPT).await
    }

    /// Whether the photo fits the gallery. Fails closed.
    pub async fn validate_photo(&self, image_base64: &str) -> bool {
        match self.try_validate_photo(image_base64).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "photo validation failed");
                false
            }
        }
    }

    /// Validation with the failure kept visible.
    ///
    /// # Errors
    ///
    /// Returns the remote error, or [`GatewayError::ContentAbsent`] if the
    /// reply had no text.
    pub async fn try_validate_photo(&self, image_base64: &str) -> Result<bool, GatewayError> {
        let reply = self.ask_about_photo(image_base64, prompt::VALIDATION_PROMPT).await?;
        let verdict = prompt::parse_verdict(&reply);
        debug!(verdict, reply = %reply.trim(), "photo validation reply");
        Ok(verdict)
    }

    async fn ask_about_photo(&self, image_base64: &str, instruction: &str) -> Result<String, GatewayError> {
        if image_base64.is_empty() {
            return Err(GatewayError::InvalidArgument("photo payload is empty".into()));
        }
        let content = ContentRequest {
            model: self.models.vision.clone(),
            parts: vec![photo_part(image_base64), RequestPart::Text(instruction.to_string())],
            image_config: None,
        };
        debug!(model = %content.model, "requesting photo analysis");
        self.call(&content).await?.text().ok_or(GatewayError::ContentAbsent)
    }

    async fn call(&self, request: &ContentRequest) -> Result<ContentResponse, GatewayError> {
        match tokio::time::timeout(self.timeout, self.model.generate_content(request)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout { secs: self.timeout.as_secs() }),
        }
    }
}

fn photo_part(image_base64: &str) -> RequestPart {
    RequestPart::InlineImage { mime_type: PHOTO_MIME.to_string(), data: image_base64.to_string() }
}

fn normalize_image(result: Result<ContentResponse, GatewayError>) -> VisualResult {
    let err = match result {
        Ok(response) => match response.first_inline_image() {
            Some(inline) => return VisualResult::ImageArtifact(prompt::data_uri(&inline.data)),
            None => GatewayError::ContentAbsent,
        },
        Err(e) => e,
    };
    let normalized = classify_failure(&err);
    warn!(error = %err, result = ?normalized, "image generation failed");
    normalized
}
