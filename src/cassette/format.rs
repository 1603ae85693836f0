//! On-disk cassette format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A recorded session: one YAML document per cassette file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in recording order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One call across a port boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Sequence number within the cassette.
    pub seq: u64,
    /// Port name (e.g., `"generative_model"`).
    pub port: String,
    /// Method name on the port.
    pub method: String,
    /// Serialized input.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Serialized output, using the `Ok`/`Err` convention. `Err` holds a
    /// [`RecordedError`].
    pub output: serde_json::Value,
}

/// Error side of a recorded output.
///
/// Variants the gateway classifies by type keep their type, so a replayed
/// run normalizes to the same result as the recorded one. Anything else is
/// kept as its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedError {
    /// Remote API error response.
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        message: String,
    },
    /// No key was available to the live adapter.
    MissingApiKey {
        /// Environment variable the key is read from.
        env_var: String,
    },
    /// The key was rejected.
    CredentialRejected,
    /// The reply carried no usable part.
    ContentAbsent,
    /// The call hit its deadline.
    Timeout {
        /// Deadline in seconds.
        secs: u64,
    },
    /// Network, IO or decoding failure, by message.
    Other {
        /// Display text of the original error.
        message: String,
    },
}

impl From<&GatewayError> for RecordedError {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Api { status, message } => {
                Self::Api { status: *status, message: message.clone() }
            }
            GatewayError::MissingApiKey { env_var } => Self::MissingApiKey { env_var: env_var.clone() },
            GatewayError::CredentialRejected => Self::CredentialRejected,
            GatewayError::ContentAbsent => Self::ContentAbsent,
            GatewayError::Timeout { secs } => Self::Timeout { secs: *secs },
            other => Self::Other { message: other.to_string() },
        }
    }
}

impl From<RecordedError> for GatewayError {
    fn from(err: RecordedError) -> Self {
        match err {
            RecordedError::Api { status, message } => Self::Api { status, message },
            RecordedError::MissingApiKey { env_var } => Self::MissingApiKey { env_var },
            RecordedError::CredentialRejected => Self::CredentialRejected,
            RecordedError::ContentAbsent => Self::ContentAbsent,
            RecordedError::Timeout { secs } => Self::Timeout { secs },
            RecordedError::Other { message } => Self::Api { status: 0, message },
        }
    }
}
