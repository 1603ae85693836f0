//! Unified error type for partybus-visuals.

use thiserror::Error;

/// Errors that can occur while talking to the generative model or handling its artifacts.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// Base64 payload or data URI could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The call succeeded but returned no usable image or text part.
    #[error("Response contained no usable content")]
    ContentAbsent,

    /// The remote call did not finish before the deadline.
    #[error("Request timed out after {secs}s")]
    Timeout {
        /// Deadline that elapsed, in seconds.
        secs: u64,
    },

    /// No API key is selected.
    #[error("No Gemini API key. Set {env_var} or add it to the config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },

    /// The requested service package is not in the catalogue.
    #[error("Unknown service '{id}'. Run `partybus-visuals services` to list them.")]
    UnknownService {
        /// Requested service id.
        id: String,
    },

    /// The remote capability rejected the selected credential.
    #[error("The selected API key was rejected. Select a valid key and try again.")]
    CredentialRejected,

    /// Generation failed; the user may re-trigger it.
    #[error("{0}")]
    GenerationFailed(String),
}
